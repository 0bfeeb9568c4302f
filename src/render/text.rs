// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Custom text rasterization.
//!
//! Text is set on a single line at a fixed pixel size and centered both
//! horizontally and vertically (on the middle of the ascent/descent box)
//! around its anchor point. Fonts default to the faces embedded in egui;
//! families can be pointed at real TTF files through configuration.

use super::compose::blend_pixel;
use crate::error::StudioError;
use crate::models::design::{HexColor, TextFont};
use crate::util::geometry::Rect;
use ab_glyph::{point, Font, FontArc, Glyph, ScaleFont};
use image::{Rgba, RgbaImage};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Pixel size used for all custom text.
pub const TEXT_PX: f32 = 24.0;

/// Loaded faces for every offered font family.
#[derive(Clone)]
pub struct FontBook {
    faces: HashMap<TextFont, FontArc>,
}

impl FontBook {
    /// Fonts backed only by the embedded faces.
    pub fn embedded() -> Self {
        let mut faces = HashMap::new();
        for family in TextFont::ALL {
            let bytes: &'static [u8] = if family.is_monospace() {
                epaint_default_fonts::HACK_REGULAR
            } else {
                epaint_default_fonts::UBUNTU_LIGHT
            };
            match FontArc::try_from_slice(bytes) {
                Ok(face) => {
                    faces.insert(family, face);
                }
                Err(e) => log::error!("Embedded font for {} is unusable: {e}", family.family()),
            }
        }
        Self { faces }
    }

    /// Embedded faces, replaced by configured font files where they load.
    pub fn with_overrides(overrides: &BTreeMap<String, PathBuf>) -> Self {
        let mut book = Self::embedded();
        for (name, path) in overrides {
            let family = match name.parse::<TextFont>() {
                Ok(family) => family,
                Err(e) => {
                    log::warn!("Ignoring font override: {e}");
                    continue;
                }
            };
            match load_font_file(family, path) {
                Ok(face) => {
                    log::info!("Using {} for {}", path.display(), family.family());
                    book.faces.insert(family, face);
                }
                Err(e) => log::warn!("{e}, keeping embedded face"),
            }
        }
        book
    }

    /// Face for a family, or any loaded face if that family failed to load.
    pub fn face(&self, family: TextFont) -> Option<&FontArc> {
        self.faces
            .get(&family)
            .or_else(|| self.faces.get(&TextFont::Arial))
            .or_else(|| TextFont::ALL.iter().find_map(|f| self.faces.get(f)))
    }
}

fn load_font_file(family: TextFont, path: &Path) -> Result<FontArc, StudioError> {
    let font_error = |reason: String| StudioError::Font {
        family: family.family().to_string(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| font_error(format!("{}: {e}", path.display())))?;
    FontArc::try_from_vec(bytes).map_err(|e| font_error(e.to_string()))
}

/// Positioned glyphs for one line of text plus its layout box.
pub struct TextLayout {
    pub glyphs: Vec<Glyph>,
    pub bounds: Rect,
}

/// Lay out `text` centered on `anchor`.
pub fn layout(face: &FontArc, text: &str, anchor: (f32, f32)) -> TextLayout {
    let scaled = face.as_scaled(TEXT_PX);

    let mut caret = 0.0f32;
    let mut previous = None;
    let mut placed = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let id = face.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        placed.push((id, caret));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    let left = anchor.0 - caret / 2.0;
    let baseline = anchor.1 + (scaled.ascent() + scaled.descent()) / 2.0;
    let glyphs = placed
        .into_iter()
        .map(|(id, x)| id.with_scale_and_position(TEXT_PX, point(left + x, baseline)))
        .collect();

    TextLayout {
        glyphs,
        bounds: Rect {
            min_x: left,
            min_y: baseline - scaled.ascent(),
            max_x: left + caret,
            max_y: baseline - scaled.descent(),
        },
    }
}

/// Rasterize `text` onto the canvas with normal alpha blending.
pub fn draw(canvas: &mut RgbaImage, face: &FontArc, text: &str, color: HexColor, anchor: (f32, f32)) {
    let [r, g, b] = color.0;
    for glyph in layout(face, text, anchor).glyphs {
        let Some(outlined) = face.outline_glyph(glyph) else {
            continue;
        };
        let origin = outlined.px_bounds().min;
        outlined.draw(|gx, gy, coverage| {
            let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            if alpha > 0 {
                let x = origin.x as i64 + gx as i64;
                let y = origin.y as i64 + gy as i64;
                blend_pixel(canvas, x, y, Rgba([r, g, b, alpha]));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_has_a_face() {
        let book = FontBook::embedded();
        for family in TextFont::ALL {
            assert!(book.face(family).is_some(), "{}", family.family());
        }
    }

    #[test]
    fn test_fallback_face_follows_family_order() {
        let is_monospace = |face: &FontArc| {
            face.h_advance_unscaled(face.glyph_id('i')) == face.h_advance_unscaled(face.glyph_id('m'))
        };
        for _ in 0..8 {
            let mut book = FontBook::embedded();
            book.faces
                .retain(|family, _| matches!(family, TextFont::Helvetica | TextFont::CourierNew));

            // Neither Georgia nor Arial loaded, Helvetica comes first in family order
            let face = book.face(TextFont::Georgia).unwrap();
            assert!(!is_monospace(face));
            assert!(is_monospace(book.face(TextFont::CourierNew).unwrap()));
        }
    }

    #[test]
    fn test_layout_is_centered_on_anchor() {
        let book = FontBook::embedded();
        let face = book.face(TextFont::Arial).unwrap();
        let layout = layout(face, "HELLO", (200.0, 305.0));

        let cx = (layout.bounds.min_x + layout.bounds.max_x) / 2.0;
        let cy = (layout.bounds.min_y + layout.bounds.max_y) / 2.0;
        assert!((cx - 200.0).abs() < 0.01);
        assert!((cy - 305.0).abs() < 0.01);
        assert!(layout.bounds.max_x - layout.bounds.min_x > TEXT_PX);
        assert_eq!(layout.glyphs.len(), 5);
    }

    #[test]
    fn test_bad_override_keeps_embedded_face() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("broken.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();

        let mut overrides = BTreeMap::new();
        overrides.insert("Georgia".to_string(), bogus);
        overrides.insert("Wingdings".to_string(), dir.path().join("missing.ttf"));

        let book = FontBook::with_overrides(&overrides);
        assert!(book.face(TextFont::Georgia).is_some());
    }

    #[test]
    fn test_draw_uses_exact_color_where_covered() {
        let book = FontBook::embedded();
        let face = book.face(TextFont::CourierNew).unwrap();
        let mut canvas = RgbaImage::new(120, 40);
        draw(&mut canvas, face, "HH", HexColor([10, 200, 30]), (60.0, 20.0));

        let solid = canvas.pixels().filter(|p| p[3] == 255).count();
        assert!(solid > 0);
        assert!(canvas
            .pixels()
            .filter(|p| p[3] > 0)
            .all(|p| p[0] == 10 && p[1] == 200 && p[2] == 30));
    }
}
