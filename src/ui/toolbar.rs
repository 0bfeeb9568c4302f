// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar for garment selection.
//!
//! This module provides the toolbar for choosing the apparel style, the
//! side being designed and the garment's base color.

use crate::models::design::Side;
use crate::models::garment::{ApparelType, BaseColor, GarmentConfiguration};

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    SetApparel(ApparelType),
    SetSide(Side),
    SetColor(BaseColor),
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, config: &GarmentConfiguration, dual_sided: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Style:");
        for kind in ApparelType::ALL {
            if ui.selectable_label(config.apparel_type == kind, kind.label()).clicked() {
                action = ToolbarAction::SetApparel(kind);
            }
        }

        ui.separator();

        ui.label("Side:");
        if ui.selectable_label(config.active_side == Side::Front, "Front").clicked() {
            action = ToolbarAction::SetSide(Side::Front);
        }
        // Back-side controls only exist for dual-sided apparel
        if dual_sided
            && ui
                .selectable_label(config.active_side == Side::Back, "Back")
                .clicked()
        {
            action = ToolbarAction::SetSide(Side::Back);
        }

        ui.separator();

        ui.label("Color:");
        for &color in BaseColor::ALL {
            let [r, g, b] = color.rgb();
            let selected = config.base_color == color;
            let stroke = if selected {
                egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 200, 0))
            } else {
                egui::Stroke::new(1.0, egui::Color32::from_gray(90))
            };
            let swatch = egui::Button::new("")
                .fill(egui::Color32::from_rgb(r, g, b))
                .stroke(stroke)
                .min_size(egui::vec2(18.0, 18.0));
            if ui.add(swatch).on_hover_text(color.name()).clicked() {
                action = ToolbarAction::SetColor(color);
            }
        }
    });

    action
}
