// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Design serialization and deserialization.
//!
//! A finished design is written as a bundle directory: the line item in
//! JSON (or YAML), one PNG per side that carries artwork, and a rendered
//! preview. Artwork pixels never go into the JSON itself.

use crate::io::media;
use crate::models::cart::CartLineItem;
use crate::models::design::Side;
use anyhow::{bail, Result};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DESIGN_JSON: &str = "design.json";
pub const DESIGN_YAML: &str = "design.yaml";
pub const PREVIEW_PNG: &str = "preview.png";

/// File name of the artwork PNG for a side inside a bundle.
pub fn artwork_file(side: Side) -> String {
    format!("{side}_artwork.png")
}

/// Export a line item to YAML format.
pub fn export_yaml(item: &CartLineItem, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(item)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export a line item to JSON format.
pub fn export_json(item: &CartLineItem, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(item)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import a line item from YAML format.
pub fn import_yaml(path: &Path) -> Result<CartLineItem> {
    let yaml = std::fs::read_to_string(path)?;
    let item = serde_yaml::from_str(&yaml)?;
    Ok(item)
}

/// Import a line item from JSON format.
pub fn import_json(path: &Path) -> Result<CartLineItem> {
    let json = std::fs::read_to_string(path)?;
    let item = serde_json::from_str(&json)?;
    Ok(item)
}

/// Export just the line item, choosing the format from the file extension.
pub fn export_design_file(item: &CartLineItem, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(item, path),
        Some("json") => export_json(item, path),
        other => bail!("unsupported design file extension: {:?}", other),
    }
}

/// Write a complete design bundle into `dir`, creating it if needed.
pub fn export_bundle(item: &CartLineItem, preview: &RgbaImage, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    export_json(item, &dir.join(DESIGN_JSON))?;

    for side in Side::ALL {
        if let Some(artwork) = item.sides.get(side).visible_artwork() {
            artwork
                .pixels
                .save_with_format(dir.join(artwork_file(side)), ImageFormat::Png)?;
        }
    }
    preview.save_with_format(dir.join(PREVIEW_PNG), ImageFormat::Png)?;

    log::info!("Exported design bundle to {}", dir.display());
    Ok(())
}

/// Read a design bundle back, reattaching artwork pixels.
///
/// Artwork whose PNG is missing or unreadable is dropped for that side.
pub fn import_bundle(dir: &Path) -> Result<CartLineItem> {
    let json = dir.join(DESIGN_JSON);
    let yaml = dir.join(DESIGN_YAML);
    let mut item = if json.exists() {
        import_json(&json)?
    } else if yaml.exists() {
        import_yaml(&yaml)?
    } else {
        bail!("no {DESIGN_JSON} or {DESIGN_YAML} in {}", dir.display());
    };

    for side in Side::ALL {
        let design = item.sides.get_mut(side);
        let Some(artwork) = design.uploaded_artwork.as_mut() else {
            continue;
        };
        let path = dir.join(artwork_file(side));
        match media::load_image(&path) {
            Ok(pixels) => artwork.pixels = Arc::new(pixels),
            Err(e) => {
                log::warn!("Dropping {side} artwork, cannot read {}: {e}", path.display());
                design.uploaded_artwork = None;
            }
        }
    }

    log::info!("Imported design bundle from {}", dir.display());
    Ok(item)
}

/// Fresh bundle directory for a cart hand-off.
pub fn cart_bundle_dir(cart_dir: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    cart_dir.join(format!("item-{millis}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::design::Artwork;
    use crate::models::garment::{BaseColor, GarmentConfiguration};
    use image::Rgba;

    fn sample_item() -> CartLineItem {
        let mut config = GarmentConfiguration {
            product_id: Some("42".to_string()),
            base_color: BaseColor::Teal,
            ..Default::default()
        };
        config.sides.front.uploaded_artwork = Some(Artwork::new(
            "logo.png",
            RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255])),
        ));
        config.sides.back.text = "BACK".to_string();
        CartLineItem::from_configuration(&config).unwrap()
    }

    #[test]
    fn test_bundle_restores_artwork() {
        let dir = tempfile::tempdir().unwrap();
        let item = sample_item();
        let preview = RgbaImage::new(2, 2);

        export_bundle(&item, &preview, dir.path()).unwrap();
        assert!(dir.path().join("front_artwork.png").exists());
        assert!(!dir.path().join("back_artwork.png").exists());
        assert!(dir.path().join(PREVIEW_PNG).exists());

        let restored = import_bundle(dir.path()).unwrap();
        assert_eq!(restored, item);
    }

    #[test]
    fn test_missing_artwork_file_drops_artwork() {
        let dir = tempfile::tempdir().unwrap();
        let item = sample_item();
        export_bundle(&item, &RgbaImage::new(1, 1), dir.path()).unwrap();
        std::fs::remove_file(dir.path().join("front_artwork.png")).unwrap();

        let restored = import_bundle(dir.path()).unwrap();
        assert!(restored.sides.front.uploaded_artwork.is_none());
        assert_eq!(restored.sides.back.text, "BACK");
    }

    #[test]
    fn test_yaml_bundle_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let mut item = sample_item();
        item.sides.front.uploaded_artwork = None;
        export_yaml(&item, &dir.path().join(DESIGN_YAML)).unwrap();

        assert_eq!(import_bundle(dir.path()).unwrap(), item);
    }

    #[test]
    fn test_design_file_format_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        let item = sample_item();

        export_design_file(&item, &dir.path().join("design.yml")).unwrap();
        let yaml = std::fs::read_to_string(dir.path().join("design.yml")).unwrap();
        assert!(yaml.contains("productId: '42'") || yaml.contains("productId: \"42\""));

        export_design_file(&item, &dir.path().join("design.json")).unwrap();
        let restored = import_json(&dir.path().join("design.json")).unwrap();
        assert_eq!(restored.product_id, "42");

        assert!(export_design_file(&item, &dir.path().join("design.txt")).is_err());
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(import_bundle(dir.path()).is_err());
    }
}
