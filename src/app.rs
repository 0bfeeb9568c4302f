// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the design surface, routes toolbar, panel
//! and canvas actions into it, and keeps the preview texture in step with
//! the surface's state.

use crate::config::StudioConfig;
use crate::io::assets::FileAssets;
use crate::io::media::ACCEPTED_EXTENSIONS;
use crate::io::serialization;
use crate::models::cart::CartLineItem;
use crate::models::catalog::Catalog;
use crate::models::garment::GarmentConfiguration;
use crate::render::text::FontBook;
use crate::surface::{DesignSurface, TemplateStatus};
use crate::ui::{canvas, properties, toolbar};
use std::path::PathBuf;
use std::sync::Arc;

/// History system for undo/redo functionality.
struct History<T> {
    /// Undo stack (past states)
    undo_stack: Vec<T>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<T>,
    /// Maximum history size
    max_size: usize,
}

impl<T> History<T> {
    fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Save current state before making a change
    fn push(&mut self, state: T) {
        self.undo_stack.push(state);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // A new edit invalidates anything that was undone
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo: restore next state
    fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Main application state.
pub struct GarmentStudioApp {
    surface: DesignSurface,
    catalog: Catalog,
    cart_dir: PathBuf,

    /// Configurations before each discrete edit
    history: History<GarmentConfiguration>,

    /// Rendered preview of the active side
    preview: Option<egui::TextureHandle>,

    /// Set whenever the surface changed since the last render
    preview_dirty: bool,

    /// Last message shown in the status bar
    status: Option<String>,
}

impl GarmentStudioApp {
    /// Create the designer, optionally seeded from a catalog product.
    pub fn new(config: StudioConfig, catalog: Catalog, product_id: Option<&str>) -> Self {
        let garment = match product_id.and_then(|id| catalog.find(id)) {
            Some(product) => {
                log::info!("Seeding design from product {}", product.id);
                GarmentConfiguration::seeded(product)
            }
            None => {
                if let Some(id) = product_id {
                    log::warn!("Product {id} is not in the catalog, starting blank");
                }
                GarmentConfiguration::default()
            }
        };

        log::info!("{} catalog products available", catalog.products().len());
        let fonts = FontBook::with_overrides(&config.fonts);
        let assets = Arc::new(FileAssets::new(config.apparel.clone()));
        let surface = DesignSurface::new(garment, config.apparel, config.upload, assets, fonts);

        let mut app = Self {
            surface,
            catalog,
            cart_dir: config.cart_dir,
            history: History::new(config.history_limit),
            preview: None,
            preview_dirty: true,
            status: None,
        };
        app.sync_product();
        app
    }

    fn checkpoint(&mut self) {
        self.history.push(self.surface.configuration().clone());
    }

    /// Give each committed upload its own undo step.
    fn record_uploads(&mut self) {
        for snapshot in self.surface.take_upload_snapshots() {
            self.history.push(snapshot);
            self.preview_dirty = true;
        }
    }

    /// Block until background work is applied, as before an export.
    fn settle(&mut self) {
        self.surface.wait_idle();
        self.record_uploads();
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Keep the chosen product consistent with the apparel type and category.
    fn sync_product(&mut self) {
        let config = self.surface.configuration();
        let pool = self.catalog.selection_pool(config.apparel_type, config.category);
        let picked = self
            .catalog
            .pick(&pool, config.product_id.as_deref())
            .map(|p| p.id.clone());
        self.select_product(picked);
    }

    fn select_product(&mut self, id: Option<String>) {
        let sizes = id
            .as_deref()
            .and_then(|id| self.catalog.find(id))
            .map(|p| p.sizes.clone())
            .unwrap_or_default();
        self.surface.set_product(id);
        let size = &self.surface.configuration().size;
        if !sizes.is_empty() && !sizes.contains(size) {
            self.surface.set_size(sizes[0].clone());
        }
    }

    fn undo(&mut self) {
        let current = self.surface.configuration().clone();
        if let Some(previous) = self.history.undo(current) {
            self.surface.replace_configuration(previous);
            self.preview_dirty = true;
            log::info!("Undo");
        }
    }

    fn redo(&mut self) {
        let current = self.surface.configuration().clone();
        if let Some(next) = self.history.redo(current) {
            self.surface.replace_configuration(next);
            self.preview_dirty = true;
            log::info!("Redo");
        }
    }

    /// Pick an image file and hand it to the surface for decoding.
    fn upload_artwork(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &ACCEPTED_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        match std::fs::read(&path) {
            Ok(bytes) => {
                let label = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| "artwork".to_string());
                let side = self.surface.upload_artwork(label.as_str(), bytes);
                self.set_status(format!("Uploading {label} to the {side}"));
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                self.set_status(format!("Could not read {}", path.display()));
            }
        }
    }

    fn export_preview(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(serialization::PREVIEW_PNG)
            .save_file()
        else {
            return;
        };

        self.settle();
        match self.surface.render().save_with_format(&path, image::ImageFormat::Png) {
            Ok(()) => {
                log::info!("Exported preview to {}", path.display());
                self.set_status(format!("Saved preview to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export preview: {}", e);
                self.set_status("Could not save the preview");
            }
        }
    }

    /// The current design as a line item, or `None` with a status message.
    fn line_item(&mut self) -> Option<CartLineItem> {
        self.settle();
        let item = CartLineItem::from_configuration(self.surface.configuration());
        if item.is_none() {
            self.set_status("Choose a product first");
        }
        item
    }

    fn save_design(&mut self) {
        let Some(item) = self.line_item() else {
            return;
        };
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        match serialization::export_bundle(&item, &self.surface.render(), &dir) {
            Ok(()) => self.set_status(format!("Saved design to {}", dir.display())),
            Err(e) => {
                log::error!("Failed to save design: {:#}", e);
                self.set_status("Could not save the design");
            }
        }
    }

    /// Write only the design description, as JSON or YAML.
    fn export_design_file(&mut self) {
        let Some(item) = self.line_item() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Design", &["json", "yaml", "yml"])
            .set_file_name(serialization::DESIGN_JSON)
            .save_file()
        else {
            return;
        };
        match serialization::export_design_file(&item, &path) {
            Ok(()) => {
                log::info!("Exported design to {}", path.display());
                self.set_status(format!("Exported design to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export design: {:#}", e);
                self.set_status("Could not export the design");
            }
        }
    }

    fn open_design(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        match serialization::import_bundle(&dir) {
            Ok(item) => {
                self.checkpoint();
                self.surface.replace_configuration(item.into_configuration());
                self.preview_dirty = true;
                self.set_status(format!("Opened design from {}", dir.display()));
            }
            Err(e) => {
                log::error!("Failed to open design: {:#}", e);
                self.set_status("Could not open that design");
            }
        }
    }

    /// Hand the design to the cart and start a fresh one on the same product.
    fn add_to_cart(&mut self) {
        let Some(item) = self.line_item() else {
            return;
        };
        let dir = serialization::cart_bundle_dir(&self.cart_dir);
        if let Err(e) = serialization::export_bundle(&item, &self.surface.render(), &dir) {
            log::error!("Failed to add design to cart: {:#}", e);
            self.set_status("Could not add to cart");
            return;
        }

        let fresh = match self.catalog.find(&item.product_id) {
            Some(product) => GarmentConfiguration::seeded(product),
            None => GarmentConfiguration::default(),
        };
        self.surface.replace_configuration(fresh);
        self.sync_product();
        self.history.clear();
        self.preview_dirty = true;
        self.set_status("Added to cart");
    }

    /// Re-render once the active template has settled.
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let loading = self.surface.template_status() == TemplateStatus::Loading;
        if !self.preview_dirty || (loading && self.preview.is_some()) {
            return;
        }

        let image = self.surface.render();
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        match &mut self.preview {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.preview =
                    Some(ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR));
            }
        }
        self.preview_dirty = loading;
    }

    fn handle_toolbar(&mut self, action: toolbar::ToolbarAction) {
        match action {
            toolbar::ToolbarAction::SetApparel(kind) => {
                self.checkpoint();
                self.surface.set_apparel_type(kind);
                self.sync_product();
            }
            toolbar::ToolbarAction::SetSide(side) => {
                self.surface.set_active_side(side);
            }
            toolbar::ToolbarAction::SetColor(color) => {
                self.checkpoint();
                self.surface.set_base_color(color);
            }
            toolbar::ToolbarAction::None => return,
        }
        self.preview_dirty = true;
    }

    fn handle_properties(&mut self, output: properties::PropertiesOutput) {
        if output.checkpoint {
            self.checkpoint();
        }
        for action in output.actions {
            match action {
                properties::PropertiesAction::SetCategory(category) => {
                    self.surface.set_category(category);
                    self.sync_product();
                }
                properties::PropertiesAction::SelectProduct(id) => self.select_product(Some(id)),
                properties::PropertiesAction::SetSize(size) => self.surface.set_size(size),
                properties::PropertiesAction::UploadArtwork => self.upload_artwork(),
                properties::PropertiesAction::RemoveArtwork => self.surface.remove_artwork(),
                properties::PropertiesAction::Transform(transform) => {
                    self.surface.set_artwork_transform(transform)
                }
                properties::PropertiesAction::SetText(text) => self.surface.set_text(text),
                properties::PropertiesAction::SetTextStyle(style) => {
                    self.surface.set_text_style(style)
                }
                properties::PropertiesAction::SetTextPosition(position) => {
                    self.surface.set_text_position(position)
                }
            }
            self.preview_dirty = true;
        }
    }

    fn handle_canvas(&mut self, action: canvas::CanvasAction) {
        match action {
            canvas::CanvasAction::StartDrag(kind, pointer) => {
                self.checkpoint();
                self.surface.drag_start(kind, pointer);
                log::debug!("Started dragging {:?}", kind);
            }
            canvas::CanvasAction::DragTo(pointer) => {
                self.surface.drag_move(pointer);
                self.preview_dirty = true;
            }
            canvas::CanvasAction::EndDrag => self.surface.drag_end(),
            canvas::CanvasAction::None => {}
        }
    }
}

impl eframe::App for GarmentStudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.surface.poll() {
            self.preview_dirty = true;
        }
        self.record_uploads();

        // Keep repainting while templates or uploads are in flight
        if self.surface.is_busy() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Upload Artwork...").clicked() {
                        self.upload_artwork();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Open Design...").clicked() {
                        self.open_design();
                        ui.close_menu();
                    }
                    if ui.button("Save Design...").clicked() {
                        self.save_design();
                        ui.close_menu();
                    }
                    if ui.button("Export Design File...").clicked() {
                        self.export_design_file();
                        ui.close_menu();
                    }
                    if ui.button("Export Preview...").clicked() {
                        self.export_preview();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let can_undo = self.history.can_undo();
                    if ui.add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                        self.undo();
                        ui.close_menu();
                    }
                    let can_redo = self.history.can_redo();
                    if ui.add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)")).clicked() {
                        self.redo();
                        ui.close_menu();
                    }
                    ui.separator();
                    let has_artwork = self.surface.active_design().uploaded_artwork.is_some();
                    if ui.add_enabled(has_artwork, egui::Button::new("Remove Artwork")).clicked() {
                        self.checkpoint();
                        self.surface.remove_artwork();
                        self.preview_dirty = true;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Cart", |ui| {
                    if ui.button("Add to Cart").clicked() {
                        self.add_to_cart();
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    self.surface.configuration(),
                    self.surface.supports_dual_sides(),
                )
            })
            .inner;
        self.handle_toolbar(toolbar_action);

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let config = self.surface.configuration();
                ui.label(format!(
                    "{} / {} / {} side",
                    config.apparel_type.label(),
                    config.base_color,
                    self.surface.active_side()
                ));
                if self.surface.is_busy() {
                    ui.spinner();
                }
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        // Properties panel (right side)
        let properties_output = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                let config = self.surface.configuration();
                let pool = self
                    .catalog
                    .selection_pool(config.apparel_type, config.category);
                let product = config.product_id.as_deref().and_then(|id| self.catalog.find(id));
                properties::show(ui, config, &pool, product)
            })
            .inner;
        self.handle_properties(properties_output);

        // Keyboard shortcuts, skipped while a text field is focused
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
                self.undo();
            }
            if ctx.input(|i| {
                (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                    || (i.modifiers.command && i.key_pressed(egui::Key::Y))
            }) {
                self.redo();
            }
        }

        self.refresh_preview(ctx);

        // Main canvas (center)
        let loading = self.surface.template_status() == TemplateStatus::Loading;
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, self.preview.as_ref(), loading, &self.surface))
            .inner;
        self.handle_canvas(canvas_action);

        if self.preview_dirty {
            ctx.request_repaint();
        }
    }
}
