// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay drag state machine: `Idle -> Dragging(kind, side) -> Idle`.
//!
//! The side is captured when the drag starts, so switching the active side
//! mid-drag keeps moving the overlay the drag began on.

use crate::models::design::{DragKind, Side};

/// Pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One step of an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    pub kind: DragKind,
    pub side: Side,
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        kind: DragKind,
        side: Side,
        last: PointerPos,
    },
}

impl DragState {
    /// Begin (or restart) a drag of `kind` on `side`.
    pub fn start(&mut self, kind: DragKind, side: Side, pointer: PointerPos) {
        *self = DragState::Dragging {
            kind,
            side,
            last: pointer,
        };
    }

    /// Advance to `pointer`, returning the movement since the last step.
    /// Does nothing while idle.
    pub fn advance(&mut self, pointer: PointerPos) -> Option<DragStep> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { kind, side, last } => {
                let step = DragStep {
                    kind: *kind,
                    side: *side,
                    dx: pointer.x - last.x,
                    dy: pointer.y - last.y,
                };
                *last = pointer;
                Some(step)
            }
        }
    }

    pub fn end(&mut self) {
        *self = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_ignores_moves() {
        let mut drag = DragState::default();
        assert_eq!(drag.advance(PointerPos::new(10.0, 10.0)), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_steps_are_relative_to_previous_pointer() {
        let mut drag = DragState::default();
        drag.start(DragKind::Text, Side::Back, PointerPos::new(100.0, 100.0));

        let step = drag.advance(PointerPos::new(110.0, 95.0)).unwrap();
        assert_eq!((step.dx, step.dy), (10.0, -5.0));
        assert_eq!((step.kind, step.side), (DragKind::Text, Side::Back));

        let step = drag.advance(PointerPos::new(112.0, 95.0)).unwrap();
        assert_eq!((step.dx, step.dy), (2.0, 0.0));

        drag.end();
        assert_eq!(drag, DragState::Idle);
    }
}
