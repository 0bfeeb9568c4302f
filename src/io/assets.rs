// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Base template sources.
//!
//! The surface asks for a template by (apparel type, side) from a
//! background thread, so sources must be shareable across threads.

use crate::config::ApparelProfiles;
use crate::error::StudioError;
use crate::io::media;
use crate::models::design::Side;
use crate::models::garment::ApparelType;
use image::RgbaImage;

pub trait AssetSource: Send + Sync {
    fn load_template(&self, apparel: ApparelType, side: Side) -> Result<RgbaImage, StudioError>;
}

/// Templates read from the paths in the apparel profiles.
pub struct FileAssets {
    profiles: ApparelProfiles,
}

impl FileAssets {
    pub fn new(profiles: ApparelProfiles) -> Self {
        Self { profiles }
    }
}

impl AssetSource for FileAssets {
    fn load_template(&self, apparel: ApparelType, side: Side) -> Result<RgbaImage, StudioError> {
        let profile = self.profiles.get(apparel);
        let path = match side {
            Side::Front => &profile.front,
            Side::Back => &profile.back,
        };
        media::load_image(path).map_err(|e| StudioError::AssetLoad {
            apparel,
            side,
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Templates held in memory, keyed by apparel type and side.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryAssets {
    templates: std::collections::HashMap<(ApparelType, Side), RgbaImage>,
}

#[cfg(test)]
impl MemoryAssets {
    pub fn with(mut self, apparel: ApparelType, side: Side, image: RgbaImage) -> Self {
        self.templates.insert((apparel, side), image);
        self
    }
}

#[cfg(test)]
impl AssetSource for MemoryAssets {
    fn load_template(&self, apparel: ApparelType, side: Side) -> Result<RgbaImage, StudioError> {
        self.templates
            .get(&(apparel, side))
            .cloned()
            .ok_or_else(|| StudioError::AssetLoad {
                apparel,
                side,
                path: "<memory>".to_string(),
                reason: "no such template".to_string(),
            })
    }
}
