// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MAPMARK - game map coordinate annotation tool
//!
//! A cross-platform desktop application for marking named coordinates on
//! game map images, either typed in, clicked on the map, or extracted from
//! screenshots through a cloud OCR service.

mod app;
mod config;
mod io;
mod models;
mod parse;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::MapMarkApp;
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = config::load()?;
    let catalog = config.catalog()?;
    log::info!("Loaded {} map(s)", catalog.list_maps().len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true)
            .with_title("MAPMARK - Game Map Annotation"),
        ..Default::default()
    };

    eframe::run_native(
        "MAPMARK",
        options,
        Box::new(move |cc| {
            if let Some(ref path) = config.font_path {
                if let Err(e) = install_font(&cc.egui_ctx, path) {
                    log::warn!("{:#}", e);
                }
            }
            Ok(Box::new(MapMarkApp::new(config, catalog)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

/// Add a font as fallback for every family so map names in CJK render.
fn install_font(ctx: &egui::Context, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read font {}", path.display()))?;

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("user_font".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("user_font".to_owned());
    }
    ctx.set_fonts(fonts);

    log::info!("Loaded font {}", path.display());
    Ok(())
}
