// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview canvas.
//!
//! This module shows the rendered garment preview and turns pointer drags
//! on the artwork or text into drag gestures in canvas pixel coordinates.

use crate::models::design::DragKind;
use crate::surface::drag::PointerPos;
use crate::surface::DesignSurface;
use crate::util::geometry::{screen_to_canvas, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    StartDrag(DragKind, PointerPos),
    DragTo(PointerPos),
    EndDrag,
}

/// Display the preview and handle drag interactions.
pub fn show(
    ui: &mut egui::Ui,
    texture: Option<&egui::TextureHandle>,
    loading: bool,
    surface: &DesignSurface,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let Some(texture) = texture else {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Preparing preview...")
                            .color(egui::Color32::from_gray(200)),
                    );
                });
            });
            return;
        };

        // Fit the preview into the panel keeping its aspect ratio
        let available = ui.available_size();
        let aspect = CANVAS_WIDTH as f32 / CANVAS_HEIGHT as f32;
        let (display_width, display_height) = if aspect > available.x / available.y {
            (available.x, available.x / aspect)
        } else {
            (available.y * aspect, available.y)
        };
        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;
        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if loading {
            ui.painter().text(
                image_rect.left_top() + egui::vec2(8.0, 8.0),
                egui::Align2::LEFT_TOP,
                "Loading template...",
                egui::FontId::proportional(13.0),
                egui::Color32::from_gray(120),
            );
        }

        let to_canvas = |pos: egui::Pos2| {
            let (x, y) = screen_to_canvas(
                pos.x,
                pos.y,
                (image_rect.min.x, image_rect.min.y),
                (display_width, display_height),
            );
            PointerPos::new(x, y)
        };

        let response = ui.allocate_rect(image_rect, egui::Sense::drag());

        if let Some(hover) = response.hover_pos() {
            let pointer = to_canvas(hover);
            if surface.is_dragging() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            } else if surface.hit_test(pointer.x, pointer.y).is_some() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
        }

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let pointer = to_canvas(pos);
                if let Some(kind) = surface.hit_test(pointer.x, pointer.y) {
                    action = CanvasAction::StartDrag(kind, pointer);
                }
            }
        } else if response.dragged() && surface.is_dragging() {
            if let Some(pos) = response.interact_pointer_pos() {
                action = CanvasAction::DragTo(to_canvas(pos));
            }
        } else if response.drag_stopped() && surface.is_dragging() {
            action = CanvasAction::EndDrag;
        }
    });

    action
}
