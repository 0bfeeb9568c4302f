// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Composite preview rendering.
//!
//! [`render`] is a pure function of the garment configuration, the loaded
//! template (if any) and the font book. It recolors the template, composites
//! it onto a transparent canvas and then draws the active side's artwork and
//! text on top. Overlays are drawn after recoloring so they are never tinted.

use super::recolor::recolor;
use super::text::{self, FontBook};
use crate::models::design::{Artwork, DesignState, DragKind};
use crate::models::garment::{BaseColor, GarmentConfiguration};
use crate::util::geometry::{percent_to_canvas, Rect, CANVAS_HEIGHT, CANVAS_WIDTH};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Placeholder garment drawn when no template is available: body and sleeves.
const SILHOUETTE_BODY: (i64, i64, i64, i64) = (50, 100, 300, 350);
const SILHOUETTE_SLEEVES: [(i64, i64, i64, i64); 2] = [(20, 120, 50, 80), (330, 120, 50, 80)];
const SILHOUETTE_OUTLINE: [u8; 3] = [0x33, 0x33, 0x33];

/// Render the preview for the configuration's active side.
pub fn render(
    config: &GarmentConfiguration,
    template: Option<&RgbaImage>,
    fonts: &FontBook,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);

    match template {
        Some(template) => {
            let mut garment = fit_to_canvas(template);
            recolor(&mut garment, config.base_color);
            composite_over(&mut canvas, &garment);
        }
        None => draw_silhouette(&mut canvas, config.base_color),
    }

    let design = config.sides.get(config.active_side);
    if let Some(artwork) = design.visible_artwork() {
        draw_artwork(&mut canvas, artwork, design);
    }
    if design.has_text() {
        if let Some(face) = fonts.face(design.text_font) {
            let anchor = percent_to_canvas(design.text_position);
            text::draw(&mut canvas, face, &design.text, design.text_color, anchor);
        }
    }

    canvas
}

/// Which overlay, if any, sits under a canvas point. Text is drawn last, so
/// it wins where the two overlap.
pub fn hit_test(design: &DesignState, fonts: &FontBook, x: f32, y: f32) -> Option<DragKind> {
    if design.has_text() {
        if let Some(face) = fonts.face(design.text_font) {
            let layout = text::layout(face, &design.text, percent_to_canvas(design.text_position));
            if layout.bounds.contains(x, y) {
                return Some(DragKind::Text);
            }
        }
    }
    if design.visible_artwork().is_some() && ArtworkPlacement::of(design).local(x, y).is_some() {
        return Some(DragKind::Artwork);
    }
    None
}

/// Source-over blend of straight (non-premultiplied) RGBA.
pub fn source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |i: usize| {
        let c = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Blend one pixel onto the canvas, ignoring points outside it.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, src: Rgba<u8>) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    *dst = source_over(*dst, src);
}

fn composite_over(canvas: &mut RgbaImage, layer: &RgbaImage) {
    for (dst, src) in canvas.pixels_mut().zip(layer.pixels()) {
        *dst = source_over(*dst, *src);
    }
}

fn fit_to_canvas(template: &RgbaImage) -> RgbaImage {
    if template.dimensions() == (CANVAS_WIDTH, CANVAS_HEIGHT) {
        template.clone()
    } else {
        imageops::resize(template, CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Triangle)
    }
}

fn fill_rect(canvas: &mut RgbaImage, (x, y, w, h): (i64, i64, i64, i64), rgb: [u8; 3]) {
    let color = Rgba([rgb[0], rgb[1], rgb[2], 255]);
    for py in y..y + h {
        for px in x..x + w {
            blend_pixel(canvas, px, py, color);
        }
    }
}

/// 2px outline centered on the rectangle's edges.
fn stroke_rect(canvas: &mut RgbaImage, (x, y, w, h): (i64, i64, i64, i64), rgb: [u8; 3]) {
    fill_rect(canvas, (x - 1, y - 1, w + 2, 2), rgb);
    fill_rect(canvas, (x - 1, y + h - 1, w + 2, 2), rgb);
    fill_rect(canvas, (x - 1, y - 1, 2, h + 2), rgb);
    fill_rect(canvas, (x + w - 1, y - 1, 2, h + 2), rgb);
}

fn draw_silhouette(canvas: &mut RgbaImage, color: BaseColor) {
    log::debug!("Drawing placeholder silhouette in {color}");
    fill_rect(canvas, SILHOUETTE_BODY, color.rgb());
    stroke_rect(canvas, SILHOUETTE_BODY, SILHOUETTE_OUTLINE);
    for sleeve in SILHOUETTE_SLEEVES {
        fill_rect(canvas, sleeve, color.rgb());
    }
    for sleeve in SILHOUETTE_SLEEVES {
        stroke_rect(canvas, sleeve, SILHOUETTE_OUTLINE);
    }
}

/// Where the artwork lands: a `scale * 2` square rotated about its center.
struct ArtworkPlacement {
    center: (f32, f32),
    half: f32,
    sin: f32,
    cos: f32,
}

impl ArtworkPlacement {
    fn of(design: &DesignState) -> Self {
        let (sin, cos) = design.artwork_rotation.to_radians().sin_cos();
        Self {
            center: percent_to_canvas(design.artwork_position),
            half: design.artwork_scale,
            sin,
            cos,
        }
    }

    /// Axis-aligned box around the rotated square.
    fn bounds(&self) -> Rect {
        let extent = self.half * (self.cos.abs() + self.sin.abs());
        Rect::from_center(self.center.0, self.center.1, extent * 2.0, extent * 2.0)
    }

    /// Canvas point to unrotated square coordinates in [0, 1), if inside.
    fn local(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        let lx = dx * self.cos + dy * self.sin;
        let ly = -dx * self.sin + dy * self.cos;
        if lx < -self.half || lx >= self.half || ly < -self.half || ly >= self.half {
            return None;
        }
        let size = self.half * 2.0;
        Some(((lx + self.half) / size, (ly + self.half) / size))
    }
}

fn draw_artwork(canvas: &mut RgbaImage, artwork: &Artwork, design: &DesignState) {
    let placement = ArtworkPlacement::of(design);
    let bounds = placement.bounds();
    let source = &artwork.pixels;
    let (src_w, src_h) = source.dimensions();

    let x0 = (bounds.min_x.floor() as i64).max(0);
    let y0 = (bounds.min_y.floor() as i64).max(0);
    let x1 = (bounds.max_x.ceil() as i64).min(i64::from(canvas.width()));
    let y1 = (bounds.max_y.ceil() as i64).min(i64::from(canvas.height()));

    for py in y0..y1 {
        for px in x0..x1 {
            // Sample at pixel centers
            let Some((u, v)) = placement.local(px as f32 + 0.5, py as f32 + 0.5) else {
                continue;
            };
            let sx = ((u * src_w as f32) as u32).min(src_w - 1);
            let sy = ((v * src_h as f32) as u32).min(src_h - 1);
            blend_pixel(canvas, px, py, *source.get_pixel(sx, sy));
        }
    }
}
