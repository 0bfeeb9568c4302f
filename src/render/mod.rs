// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview rendering: template recoloring, overlay compositing and text.

pub mod compose;
pub mod recolor;
pub mod text;
