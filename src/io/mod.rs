// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for templates, uploaded artwork and design bundles.

pub mod assets;
pub mod media;
pub mod serialization;
