// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Design properties panel.
//!
//! This module provides the side panel for choosing the product and size
//! and for editing the active side's artwork and text.

use crate::models::catalog::Product;
use crate::models::design::{ArtworkTransform, HexColor, PercentPoint, TextFont, TextStyle};
use crate::models::garment::{Category, GarmentConfiguration};
use crate::util::geometry::{MAX_SCALE, MIN_SCALE};

/// A single edit requested from the panel.
pub enum PropertiesAction {
    SetCategory(Category),
    SelectProduct(String),
    SetSize(String),
    UploadArtwork,
    RemoveArtwork,
    Transform(ArtworkTransform),
    SetText(String),
    SetTextStyle(TextStyle),
    SetTextPosition(PercentPoint),
}

/// Everything the panel produced this frame.
#[derive(Default)]
pub struct PropertiesOutput {
    pub actions: Vec<PropertiesAction>,
    /// True when an edit starts that should get its own undo step.
    pub checkpoint: bool,
}

impl PropertiesOutput {
    fn track(&mut self, response: &egui::Response) {
        self.checkpoint |= response.drag_started()
            || response.gained_focus()
            || (response.changed() && !response.dragged() && !response.has_focus());
    }
}

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    config: &GarmentConfiguration,
    pool: &[&Product],
    product: Option<&Product>,
) -> PropertiesOutput {
    let mut out = PropertiesOutput::default();
    let design = config.sides.get(config.active_side);

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.heading("Product");
        ui.horizontal(|ui| {
            for category in Category::SELECTABLE {
                if ui.selectable_label(config.category == category, category.name()).clicked() {
                    out.actions.push(PropertiesAction::SetCategory(category));
                    out.checkpoint = true;
                }
            }
        });

        let selected_text = product
            .map(|p| product_label(p))
            .unwrap_or_else(|| "No products".to_string());
        egui::ComboBox::from_id_source("product")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for candidate in pool {
                    let selected = product.map(|p| p.id == candidate.id).unwrap_or(false);
                    if ui.selectable_label(selected, product_label(candidate)).clicked() {
                        out.actions
                            .push(PropertiesAction::SelectProduct(candidate.id.clone()));
                        out.checkpoint = true;
                    }
                }
            });

        if let Some(product) = product {
            if !product.description.is_empty() {
                ui.label(egui::RichText::new(&product.description).weak());
            }
            ui.horizontal_wrapped(|ui| {
                ui.label("Size:");
                for size in &product.sizes {
                    if ui.selectable_label(&config.size == size, size).clicked() {
                        out.actions.push(PropertiesAction::SetSize(size.clone()));
                        out.checkpoint = true;
                    }
                }
            });
        }

        ui.separator();
        ui.heading(format!("Artwork ({})", config.active_side));

        ui.horizontal(|ui| {
            if ui.button("Upload...").clicked() {
                out.actions.push(PropertiesAction::UploadArtwork);
            }
            let has_artwork = design.uploaded_artwork.is_some();
            if ui.add_enabled(has_artwork, egui::Button::new("Remove")).clicked() {
                out.actions.push(PropertiesAction::RemoveArtwork);
                out.checkpoint = true;
            }
        });
        if let Some(artwork) = &design.uploaded_artwork {
            ui.label(egui::RichText::new(&artwork.label).weak());
        }

        let mut scale = design.artwork_scale;
        let response = ui.add(egui::Slider::new(&mut scale, MIN_SCALE..=MAX_SCALE).text("Size"));
        out.track(&response);
        if response.changed() {
            out.actions.push(PropertiesAction::Transform(ArtworkTransform {
                scale: Some(scale),
                ..Default::default()
            }));
        }

        let mut rotation = design.artwork_rotation;
        let response = ui.add(egui::Slider::new(&mut rotation, 0.0..=359.0).text("Rotation"));
        out.track(&response);
        if response.changed() {
            out.actions.push(PropertiesAction::Transform(ArtworkTransform {
                rotation: Some(rotation),
                ..Default::default()
            }));
        }

        ui.separator();
        ui.heading("Text");

        let mut text = design.text.clone();
        let response = ui.add(egui::TextEdit::singleline(&mut text).hint_text("Your text"));
        out.track(&response);
        if response.changed() {
            out.actions.push(PropertiesAction::SetText(text));
        }

        egui::ComboBox::from_label("Font")
            .selected_text(design.text_font.family())
            .show_ui(ui, |ui| {
                for font in TextFont::ALL {
                    if ui.selectable_label(design.text_font == font, font.family()).clicked() {
                        out.actions.push(PropertiesAction::SetTextStyle(TextStyle {
                            font: Some(font),
                            ..Default::default()
                        }));
                        out.checkpoint = true;
                    }
                }
            });

        ui.horizontal(|ui| {
            ui.label("Color:");
            let mut rgb = design.text_color.0;
            let response = ui.color_edit_button_srgb(&mut rgb);
            out.checkpoint |= response.clicked();
            if response.changed() {
                out.actions.push(PropertiesAction::SetTextStyle(TextStyle {
                    color: Some(HexColor(rgb)),
                    ..Default::default()
                }));
            }
            ui.label(egui::RichText::new(design.text_color.to_string()).monospace());
        });

        let mut position = design.text_position;
        let response_x = ui.add(egui::Slider::new(&mut position.x, 0.0..=100.0).text("Text X"));
        let response_y = ui.add(egui::Slider::new(&mut position.y, 0.0..=100.0).text("Text Y"));
        out.track(&response_x);
        out.track(&response_y);
        if response_x.changed() || response_y.changed() {
            out.actions.push(PropertiesAction::SetTextPosition(position));
        }

        ui.separator();
        ui.label(
            egui::RichText::new("Drag the artwork or text on the preview to move it")
                .italics()
                .weak(),
        );
    });

    out
}

fn product_label(product: &Product) -> String {
    format!("{} - ₹{:.0}", product.name, product.price)
}
