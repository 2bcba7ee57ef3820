// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption Studio desktop application.

mod app;
mod ui;

use anyhow::Result;
use app::CaptionStudioApp;
use caption_studio::{Editor, EditorConfig};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = EditorConfig::load();
    let editor = Editor::new(config)?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Caption Studio"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Caption Studio",
        options,
        Box::new(|_cc| Ok(Box::new(CaptionStudioApp::new(editor)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
