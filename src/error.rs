// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the design core.
//!
//! None of these are fatal: the surface logs them and keeps rendering with
//! whatever it has (fallback silhouette, previous artwork, default font).

use crate::models::design::Side;
use crate::models::garment::ApparelType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("failed to load {apparel} {side} template from {path}: {reason}")]
    AssetLoad {
        apparel: ApparelType,
        side: Side,
        path: String,
        reason: String,
    },

    #[error("artwork decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("upload rejected: {0}")]
    UploadRejected(String),

    #[error("{0} panicked")]
    JobPanicked(String),

    #[error("font {family} unavailable: {reason}")]
    Font { family: String, reason: String },
}
