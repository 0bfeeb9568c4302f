// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Overlay positions are stored in percentage space (0 to 100 on each axis)
//! and mapped onto the fixed preview canvas with a linear offset around the
//! canvas anchor point. This module owns that mapping, the clamping rules
//! for every numeric design input, and the screen to canvas conversion used
//! by the canvas widget.

use crate::models::design::PercentPoint;

/// Width of the rendered preview in pixels.
pub const CANVAS_WIDTH: u32 = 400;
/// Height of the rendered preview in pixels.
pub const CANVAS_HEIGHT: u32 = 500;
/// Point that a (50, 50) overlay position maps to.
pub const CANVAS_ANCHOR: (f32, f32) = (200.0, 275.0);
/// Canvas pixels per percentage unit away from the anchor.
pub const PERCENT_TO_PIXELS: f32 = 3.0;
/// Pointer pixels per percentage unit while dragging an overlay.
pub const DRAG_DIVISOR: f32 = 5.0;

pub const MIN_SCALE: f32 = 20.0;
pub const MAX_SCALE: f32 = 200.0;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    /// Build a rectangle of the given size centered on a point.
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: cx - width / 2.0,
            min_y: cy - height / 2.0,
            max_x: cx + width / 2.0,
            max_y: cy + height / 2.0,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}

/// Clamp a single percentage coordinate into [0, 100].
pub fn clamp_percent(value: f32) -> f32 {
    value.clamp(0.0, 100.0)
}

/// Clamp an artwork scale into [20, 200].
pub fn clamp_scale(value: f32) -> f32 {
    value.clamp(MIN_SCALE, MAX_SCALE)
}

/// Wrap a rotation in degrees into [0, 360).
pub fn wrap_rotation(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Map an overlay position to the canvas pixel it is centered on.
pub fn percent_to_canvas(position: PercentPoint) -> (f32, f32) {
    (
        CANVAS_ANCHOR.0 + (position.x - 50.0) * PERCENT_TO_PIXELS,
        CANVAS_ANCHOR.1 + (position.y - 50.0) * PERCENT_TO_PIXELS,
    )
}

/// Move a position by a pointer delta, keeping it inside [0, 100] per axis.
pub fn apply_drag_delta(position: PercentPoint, dx: f32, dy: f32) -> PercentPoint {
    PercentPoint {
        x: clamp_percent(position.x + dx / DRAG_DIVISOR),
        y: clamp_percent(position.y + dy / DRAG_DIVISOR),
    }
}

/// Convert a screen position inside the displayed preview to canvas pixels.
pub fn screen_to_canvas(
    screen_x: f32,
    screen_y: f32,
    display_min: (f32, f32),
    display_size: (f32, f32),
) -> (f32, f32) {
    (
        (screen_x - display_min.0) / display_size.0 * CANVAS_WIDTH as f32,
        (screen_y - display_min.1) / display_size.1 * CANVAS_HEIGHT as f32,
    )
}
