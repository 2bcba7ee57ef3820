// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption control panel.
//!
//! One entry per caption with its text, font size and color, plus a remove
//! button. Focusing an entry selects its caption.

use caption_studio::models::caption::{
    format_hex_color, CaptionId, CaptionUpdate, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
use caption_studio::Editor;

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    Add,
    Select(CaptionId),
    Update(CaptionId, CaptionUpdate),
    Remove(CaptionId),
}

/// Display the caption list.
pub fn show(ui: &mut egui::Ui, editor: &Editor) -> Vec<PropertiesAction> {
    let mut actions = Vec::new();

    ui.heading("Captions");
    ui.separator();

    if ui.button("➕ Add caption").clicked() {
        actions.push(PropertiesAction::Add);
    }
    ui.add_space(8.0);

    let captions = editor.document().captions();
    if captions.is_empty() {
        ui.label(egui::RichText::new("No captions yet").weak());
        return actions;
    }

    let selected = editor.document().selected_id();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for caption in captions {
            let id = caption.id;
            let is_selected = selected == Some(id);

            let frame = if is_selected {
                egui::Frame::group(ui.style()).stroke(egui::Stroke::new(
                    1.5,
                    egui::Color32::from_rgb(0x3B, 0x82, 0xF6),
                ))
            } else {
                egui::Frame::group(ui.style())
            };

            frame.show(ui, |ui| {
                ui.set_width(ui.available_width());

                ui.horizontal(|ui| {
                    if ui
                        .selectable_label(is_selected, format!("Caption {}", id))
                        .clicked()
                    {
                        actions.push(PropertiesAction::Select(id));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("🗑").on_hover_text("Remove caption").clicked() {
                            actions.push(PropertiesAction::Remove(id));
                        }
                    });
                });

                let mut text = caption.text.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .id(egui::Id::new(("panel_text", id)))
                        .hint_text("Caption text")
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    actions.push(PropertiesAction::Update(id, CaptionUpdate::Text(text)));
                }
                if response.gained_focus() && !is_selected {
                    actions.push(PropertiesAction::Select(id));
                }

                ui.horizontal(|ui| {
                    ui.label("Size");
                    let mut font_size = caption.font_size;
                    let slider = ui.add(
                        egui::Slider::new(&mut font_size, MIN_FONT_SIZE..=MAX_FONT_SIZE)
                            .step_by(1.0)
                            .suffix(" px"),
                    );
                    if slider.changed() {
                        actions.push(PropertiesAction::Update(id, CaptionUpdate::FontSize(font_size)));
                    }
                    if slider.gained_focus() && !is_selected {
                        actions.push(PropertiesAction::Select(id));
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Color");
                    let mut rgb = caption.rgb();
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        actions.push(PropertiesAction::Update(
                            id,
                            CaptionUpdate::Color(format_hex_color(rgb)),
                        ));
                    }
                    ui.label(egui::RichText::new(&caption.color).monospace().weak());
                });
            });
            ui.add_space(4.0);
        }
    });

    actions
}
