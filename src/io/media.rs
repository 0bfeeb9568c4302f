// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster image loading.
//!
//! Template images are read from disk as-is. Uploaded artwork comes from an
//! untrusted file picker, so it is checked against the configured size and
//! dimension limits and restricted to a few common formats before the
//! decoder sees it.

use crate::config::UploadLimits;
use crate::error::StudioError;
use image::{ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Formats accepted for uploaded artwork.
pub const ACCEPTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::WebP,
];

/// File extensions offered by the upload dialog.
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Load an image file and convert it to RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage, image::ImageError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Validate and decode uploaded artwork bytes.
pub fn decode_artwork(bytes: &[u8], limits: &UploadLimits) -> Result<RgbaImage, StudioError> {
    if bytes.is_empty() {
        return Err(StudioError::UploadRejected("file is empty".to_string()));
    }
    if bytes.len() > limits.max_bytes {
        return Err(StudioError::UploadRejected(format!(
            "file is {} bytes, limit is {}",
            bytes.len(),
            limits.max_bytes
        )));
    }

    let format = image::guess_format(bytes)?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(StudioError::UploadRejected(format!(
            "{format:?} images are not accepted"
        )));
    }

    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format).into_dimensions()?;
    if width > limits.max_dimension || height > limits.max_dimension {
        return Err(StudioError::UploadRejected(format!(
            "image is {width}x{height}, limit is {0}x{0}",
            limits.max_dimension
        )));
    }

    let decoded = ImageReader::with_format(Cursor::new(bytes), format).decode()?;
    Ok(decoded.to_rgba8())
}

/// Encode an image as PNG bytes.
#[cfg(test)]
pub fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding into memory cannot fail");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_decodes_png() {
        let source = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let decoded = decode_artwork(&encode_png(&source), &UploadLimits::default()).unwrap();
        assert_eq!(decoded, source);
    }

    #[test]
    fn test_rejects_oversized_files() {
        let bytes = encode_png(&RgbaImage::new(4, 4));
        let limits = UploadLimits {
            max_bytes: 8,
            ..Default::default()
        };
        assert!(matches!(
            decode_artwork(&bytes, &limits),
            Err(StudioError::UploadRejected(_))
        ));
    }

    #[test]
    fn test_rejects_large_dimensions() {
        let bytes = encode_png(&RgbaImage::new(64, 8));
        let limits = UploadLimits {
            max_dimension: 32,
            ..Default::default()
        };
        assert!(matches!(
            decode_artwork(&bytes, &limits),
            Err(StudioError::UploadRejected(_))
        ));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = decode_artwork(b"definitely not an image", &UploadLimits::default());
        assert!(matches!(result, Err(StudioError::Decode(_))));
        assert!(matches!(
            decode_artwork(&[], &UploadLimits::default()),
            Err(StudioError::UploadRejected(_))
        ));
    }
}
