// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Garment Studio
//!
//! A cross-platform desktop designer for custom printed t-shirts and
//! hoodies: pick a garment and color, place artwork and text on the front
//! and back, and hand the finished design to the cart.

mod app;
mod config;
mod error;
mod io;
mod models;
mod render;
mod surface;
mod ui;
mod util;

use anyhow::Result;
use app::GarmentStudioApp;
use config::StudioConfig;
use models::catalog::Catalog;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = StudioConfig::load()?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path).unwrap_or_else(|e| {
            log::warn!("Starting without a catalog: {:#}", e);
            Catalog::default()
        }),
        None => Catalog::default(),
    };

    // Optional product id to seed the design from
    let product_id = std::env::args().nth(1);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Garment Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "Garment Studio",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(GarmentStudioApp::new(
                config,
                catalog,
                product_id.as_deref(),
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
