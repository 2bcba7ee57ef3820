// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: background sources, caption creation and export.

use std::path::Path;

/// Result of toolbar interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Upload,
    Template(String),
    AddCaption,
    Export,
}

/// Short display name for a catalog entry.
fn template_label(reference: &str) -> String {
    Path::new(reference)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| reference.to_string())
}

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    templates: &[String],
    has_background: bool,
    is_loading: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.add_enabled_ui(!is_loading, |ui| {
            if ui.button("📂 Upload image").clicked() {
                action = ToolbarAction::Upload;
            }

            ui.menu_button("🖼 Templates", |ui| {
                if templates.is_empty() {
                    ui.label(egui::RichText::new("No templates configured").weak());
                }
                for reference in templates {
                    if ui.button(template_label(reference)).clicked() {
                        action = ToolbarAction::Template(reference.clone());
                        ui.close_menu();
                    }
                }
            });
        });

        ui.separator();

        if ui.button("➕ Add caption").clicked() {
            action = ToolbarAction::AddCaption;
        }

        ui.separator();

        if ui
            .add_enabled(has_background, egui::Button::new("💾 Export PNG"))
            .on_disabled_hover_text("Choose a background image first")
            .clicked()
        {
            action = ToolbarAction::Export;
        }

        ui.separator();

        let hint = if has_background {
            "Drag captions to move them, drag a corner to resize, click the canvas to add text"
        } else {
            "Upload an image or pick a template to get started"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
