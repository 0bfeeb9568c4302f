// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Garment template recoloring.
//!
//! Only pixels that belong to the garment are touched: anything at or below
//! [`ALPHA_THRESHOLD`] is background or edge fringe and is left alone. The
//! alpha channel is never modified.

use crate::models::garment::{BaseColor, ColorCategory};
use image::RgbaImage;

/// Pixels with alpha at or below this are treated as background.
pub const ALPHA_THRESHOLD: u8 = 10;

/// White garments are only brightened when darker than this average.
const WHITE_BRIGHTNESS_FLOOR: u16 = 200;
const WHITE_BOOST: u8 = 20;

/// Recolor a template in place.
pub fn recolor(template: &mut RgbaImage, color: BaseColor) {
    let category = color.category();
    let target = color.rgb();

    for pixel in template.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a <= ALPHA_THRESHOLD {
            continue;
        }

        let rgb = match category.blend_factor() {
            Some(factor) => tint([r, g, b], target, factor),
            None if category == ColorCategory::Black => [0, 0, 0],
            None => brighten([r, g, b]),
        };
        pixel.0 = [rgb[0], rgb[1], rgb[2], a];
    }
}

fn brighten(rgb: [u8; 3]) -> [u8; 3] {
    let sum: u16 = rgb.iter().map(|&c| c as u16).sum();
    if sum < WHITE_BRIGHTNESS_FLOOR * 3 {
        rgb.map(|c| c.saturating_add(WHITE_BOOST))
    } else {
        rgb
    }
}

/// Tint toward `target` scaled by the pixel's luma, keeping folds and shading.
fn tint(rgb: [u8; 3], target: [u8; 3], factor: f64) -> [u8; 3] {
    let [r, g, b] = rgb.map(f64::from);
    let luma = (0.299 * r + 0.587 * g + 0.114 * b) / 255.0;

    let mut out = [0u8; 3];
    for i in 0..3 {
        let shaded = f64::from(target[i]) * luma;
        let blended = shaded * factor + f64::from(rgb[i]) * (1.0 - factor);
        out[i] = blended.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn swatch() -> RgbaImage {
        // Mix of garment shades, fringe and background
        let pixels = [
            [255, 255, 255, 255],
            [180, 180, 180, 255],
            [40, 60, 90, 200],
            [120, 30, 10, 11],
            [90, 90, 90, 10],
            [0, 0, 0, 0],
            [250, 190, 20, 128],
            [12, 12, 12, 255],
        ];
        let mut image = RgbaImage::new(pixels.len() as u32, 1);
        for (x, p) in pixels.into_iter().enumerate() {
            image.put_pixel(x as u32, 0, Rgba(p));
        }
        image
    }

    #[test]
    fn test_black_clears_garment_and_keeps_alpha() {
        let original = swatch();
        let mut image = original.clone();
        recolor(&mut image, BaseColor::Black);

        for (before, after) in original.pixels().zip(image.pixels()) {
            assert_eq!(after[3], before[3]);
            if before[3] > ALPHA_THRESHOLD {
                assert_eq!(&after.0[..3], &[0, 0, 0]);
            } else {
                assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn test_white_never_darkens() {
        let original = swatch();
        let mut image = original.clone();
        recolor(&mut image, BaseColor::White);

        for (before, after) in original.pixels().zip(image.pixels()) {
            for c in 0..4 {
                assert!(after[c] >= before[c]);
            }
        }
        // Already bright pixels are untouched, dim ones gain 20 per channel
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([200, 200, 200, 255]));
        assert_eq!(image.get_pixel(4, 0), &Rgba([90, 90, 90, 10]));
    }

    #[test]
    fn test_tint_blends_by_luma() {
        let mut image = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        recolor(&mut image, BaseColor::Red);
        // Standard colors blend at 0.65: 255*0.65 + 255*0.35 and 0*0.65 + 255*0.35
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 89, 89, 255]));

        let mut image = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        recolor(&mut image, BaseColor::Navy);
        // Zero luma leaves nothing to tint
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_tint_uses_category_factor() {
        let gray = Rgba([128, 128, 128, 255]);
        let luma = 128.0 / 255.0;

        let mut light = RgbaImage::from_pixel(1, 1, gray);
        recolor(&mut light, BaseColor::Silver);
        let expected = (192.0 * luma * 0.55 + 128.0 * 0.45_f64).round() as u8;
        assert_eq!(light.get_pixel(0, 0)[0], expected);

        let mut bright = RgbaImage::from_pixel(1, 1, gray);
        recolor(&mut bright, BaseColor::Cyan);
        let expected = (255.0 * luma * 0.70 + 128.0 * 0.30_f64).round() as u8;
        assert_eq!(bright.get_pixel(0, 0)[1], expected);
    }
}
