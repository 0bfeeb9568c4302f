// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-side design state.
//!
//! Each garment side (front and back) carries its own artwork, text and
//! placement. Every setter clamps its input so the stored state is always
//! valid; non-finite numbers leave the previous value in place.

use crate::util::geometry::{clamp_percent, clamp_scale, wrap_rotation};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A garment side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Front, Side::Back];

    pub fn name(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which overlay a drag gesture moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Artwork,
    Text,
}

/// A point in percentage coordinates (0.0 to 100.0) relative to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f32,
    pub y: f32,
}

impl PercentPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp both axes into [0, 100], keeping `fallback` for non-finite axes.
    fn clamped_or(self, fallback: PercentPoint) -> Self {
        Self {
            x: finite_or(self.x, fallback.x, clamp_percent),
            y: finite_or(self.y, fallback.y, clamp_percent),
        }
    }
}

fn finite_or(value: f32, fallback: f32, clamp: fn(f32) -> f32) -> f32 {
    if value.is_finite() {
        clamp(value)
    } else {
        fallback
    }
}

/// Font families offered for custom text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextFont {
    #[serde(rename = "Arial")]
    Arial,
    #[serde(rename = "Helvetica")]
    Helvetica,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    #[serde(rename = "Courier New")]
    CourierNew,
    #[serde(rename = "Verdana")]
    Verdana,
    #[serde(rename = "Georgia")]
    Georgia,
    #[serde(rename = "Comic Sans MS")]
    ComicSans,
}

impl TextFont {
    pub const ALL: [TextFont; 7] = [
        TextFont::Arial,
        TextFont::Helvetica,
        TextFont::TimesNewRoman,
        TextFont::CourierNew,
        TextFont::Verdana,
        TextFont::Georgia,
        TextFont::ComicSans,
    ];

    pub fn family(self) -> &'static str {
        match self {
            TextFont::Arial => "Arial",
            TextFont::Helvetica => "Helvetica",
            TextFont::TimesNewRoman => "Times New Roman",
            TextFont::CourierNew => "Courier New",
            TextFont::Verdana => "Verdana",
            TextFont::Georgia => "Georgia",
            TextFont::ComicSans => "Comic Sans MS",
        }
    }

    pub fn is_monospace(self) -> bool {
        matches!(self, TextFont::CourierNew)
    }
}

impl FromStr for TextFont {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextFont::ALL
            .into_iter()
            .find(|font| font.family().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown font family: {s}"))
    }
}

/// An RGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const BLACK: HexColor = HexColor([0, 0, 0]);
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("expected #RRGGBB, got {s:?}"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|e| format!("bad hex color {s:?}: {e}"))
        };
        Ok(HexColor([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Decoded artwork uploaded for one side.
///
/// Pixels are shared so undo snapshots stay cheap. They are not part of the
/// serialized form; design bundles store them as separate PNG files.
#[derive(Clone, Serialize, Deserialize)]
pub struct Artwork {
    pub label: String,
    #[serde(skip, default = "empty_pixels")]
    pub pixels: Arc<RgbaImage>,
}

fn empty_pixels() -> Arc<RgbaImage> {
    Arc::new(RgbaImage::new(0, 0))
}

impl Artwork {
    pub fn new(label: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            label: label.into(),
            pixels: Arc::new(pixels),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }
}

impl PartialEq for Artwork {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && (Arc::ptr_eq(&self.pixels, &other.pixels) || *self.pixels == *other.pixels)
    }
}

impl fmt::Debug for Artwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artwork")
            .field("label", &self.label)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

/// Optional artwork transform update. `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArtworkTransform {
    pub position: Option<PercentPoint>,
    pub scale: Option<f32>,
    pub rotation: Option<f32>,
}

/// Optional text style update. `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextStyle {
    pub font: Option<TextFont>,
    pub color: Option<HexColor>,
}

/// Design state for a single garment side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignState {
    pub uploaded_artwork: Option<Artwork>,
    pub artwork_position: PercentPoint,
    pub artwork_scale: f32,
    pub artwork_rotation: f32,
    pub text: String,
    pub text_font: TextFont,
    pub text_color: HexColor,
    pub text_position: PercentPoint,
}

impl Default for DesignState {
    fn default() -> Self {
        Self {
            uploaded_artwork: None,
            artwork_position: PercentPoint::new(50.0, 50.0),
            artwork_scale: 100.0,
            artwork_rotation: 0.0,
            text: String::new(),
            text_font: TextFont::Arial,
            text_color: HexColor::BLACK,
            text_position: PercentPoint::new(50.0, 60.0),
        }
    }
}

impl DesignState {
    pub fn apply_transform(&mut self, transform: ArtworkTransform) {
        if let Some(position) = transform.position {
            self.artwork_position = position.clamped_or(self.artwork_position);
        }
        if let Some(scale) = transform.scale {
            self.artwork_scale = finite_or(scale, self.artwork_scale, clamp_scale);
        }
        if let Some(rotation) = transform.rotation {
            self.artwork_rotation = finite_or(rotation, self.artwork_rotation, wrap_rotation);
        }
    }

    pub fn apply_text_style(&mut self, style: TextStyle) {
        if let Some(font) = style.font {
            self.text_font = font;
        }
        if let Some(color) = style.color {
            self.text_color = color;
        }
    }

    pub fn set_text_position(&mut self, position: PercentPoint) {
        self.text_position = position.clamped_or(self.text_position);
    }

    /// Artwork that should be drawn, if any.
    pub fn visible_artwork(&self) -> Option<&Artwork> {
        self.uploaded_artwork.as_ref().filter(|art| !art.is_empty())
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Design state for both sides of a garment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sides {
    pub front: DesignState,
    pub back: DesignState,
}

impl Sides {
    pub fn get(&self, side: Side) -> &DesignState {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut DesignState {
        match side {
            Side::Front => &mut self.front,
            Side::Back => &mut self.back,
        }
    }
}
