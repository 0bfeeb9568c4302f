// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Studio configuration.
//!
//! Settings live in a YAML file named by `GARMENT_STUDIO_CONFIG`, falling
//! back to `garment_studio.yaml` in the working directory. A missing file
//! is not an error: every field has a default.

use crate::models::garment::ApparelType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "GARMENT_STUDIO_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "garment_studio.yaml";

/// Template paths and side support for one apparel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApparelProfile {
    pub front: PathBuf,
    pub back: PathBuf,
    #[serde(default = "default_true")]
    pub dual_sided: bool,
}

fn default_true() -> bool {
    true
}

impl ApparelProfile {
    fn bundled(kind: ApparelType) -> Self {
        Self {
            front: PathBuf::from(format!("assets/{}-front.png", kind.name())),
            back: PathBuf::from(format!("assets/{}-back.png", kind.name())),
            dual_sided: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApparelProfiles {
    #[serde(rename = "t-shirt")]
    pub t_shirt: ApparelProfile,
    pub hoodie: ApparelProfile,
}

impl Default for ApparelProfiles {
    fn default() -> Self {
        Self {
            t_shirt: ApparelProfile::bundled(ApparelType::TShirt),
            hoodie: ApparelProfile::bundled(ApparelType::Hoodie),
        }
    }
}

impl ApparelProfiles {
    pub fn get(&self, kind: ApparelType) -> &ApparelProfile {
        match kind {
            ApparelType::TShirt => &self.t_shirt,
            ApparelType::Hoodie => &self.hoodie,
        }
    }

    pub fn supports_dual_sides(&self, kind: ApparelType) -> bool {
        self.get(kind).dual_sided
    }
}

/// Limits applied to uploaded artwork before it is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    pub max_bytes: usize,
    pub max_dimension: u32,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_dimension: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub apparel: ApparelProfiles,
    /// Font family name to TTF/OTF path overrides.
    pub fonts: BTreeMap<String, PathBuf>,
    pub upload: UploadLimits,
    pub catalog_path: Option<PathBuf>,
    pub cart_dir: PathBuf,
    pub history_limit: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            apparel: ApparelProfiles::default(),
            fonts: BTreeMap::new(),
            upload: UploadLimits::default(),
            catalog_path: None,
            cart_dir: PathBuf::from("cart"),
            history_limit: 50,
        }
    }
}

impl StudioConfig {
    /// Load from `GARMENT_STUDIO_CONFIG` or the default file name.
    pub fn load() -> Result<Self> {
        let path = match std::env::var(CONFIG_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => {
                log::info!("{CONFIG_ENV} not set, using {DEFAULT_CONFIG_FILE}");
                PathBuf::from(DEFAULT_CONFIG_FILE)
            }
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_yaml(&yaml)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
