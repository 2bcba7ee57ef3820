// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns an [`Editor`] and translates UI actions into editor calls.
//! The composite is re-rendered into a texture whenever the document
//! revision changes.

use crate::ui::canvas::{self, CanvasAction};
use crate::ui::properties::{self, PropertiesAction};
use crate::ui::toolbar::{self, ToolbarAction};
use anyhow::{Context, Result};
use caption_studio::io::export::save_blob;
use caption_studio::io::serialization::{export_snapshot, import_snapshot};
use caption_studio::{BackgroundKind, BackgroundRef, Editor, LoadEvent, LoadStateRequest};
use std::path::PathBuf;

/// Main application state.
pub struct CaptionStudioApp {
    editor: Editor,

    /// Rendered composite for display
    texture: Option<egui::TextureHandle>,

    /// Document revision the texture was rendered from
    texture_revision: Option<u64>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last status or error message for the status bar
    status: Option<String>,
}

impl CaptionStudioApp {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            texture: None,
            texture_revision: None,
            loading_message: None,
            status: None,
        }
    }

    /// Read an image from disk and load it as an upload.
    fn open_image(&mut self, path: PathBuf) {
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::info!("Uploading {}", path.display());
                self.editor
                    .load_background(BackgroundRef::from_bytes(bytes), BackgroundKind::Upload);
                self.loading_message = Some("Loading image...".to_string());
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                self.status = Some(format!("Could not read {}: {}", path.display(), e));
            }
        }
    }

    fn load_template(&mut self, reference: &str) {
        self.editor
            .load_background(BackgroundRef::parse(reference), BackgroundKind::Template);
        self.loading_message = Some("Loading template...".to_string());
    }

    /// Load a saved snapshot and start restoring it.
    fn load_snapshot(&mut self, path: PathBuf) {
        match import_snapshot(&path) {
            Ok(snapshot) => {
                log::info!(
                    "Imported {} captions from {}",
                    snapshot.captions.len(),
                    path.display()
                );
                let has_background = snapshot.background_ref.is_some();
                self.editor.load_state(LoadStateRequest {
                    image_url: None,
                    canvas_state: snapshot,
                });
                if has_background {
                    self.loading_message = Some("Loading snapshot...".to_string());
                }
            }
            Err(e) => {
                log::error!("Failed to import snapshot: {:#}", e);
                self.status = Some(format!("Failed to import snapshot: {}", e));
            }
        }
    }

    fn save_snapshot(&mut self, path: PathBuf) {
        match export_snapshot(&self.editor.get_state(), &path) {
            Ok(()) => {
                log::info!("Saved snapshot to {}", path.display());
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save snapshot: {:#}", e);
                self.status = Some(format!("Failed to save snapshot: {}", e));
            }
        }
    }

    fn export_png(&mut self, path: PathBuf) -> Result<()> {
        let blob = self.editor.export_blob().context("Failed to render image")?;
        save_blob(&blob, &path).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn export_with_dialog(&mut self) {
        if !self.editor.has_background() {
            self.status = Some("Choose a background image before exporting".to_string());
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name("caption.png")
            .save_file()
        else {
            return;
        };

        match self.export_png(path.clone()) {
            Ok(()) => {
                log::info!("Exported image to {}", path.display());
                self.status = Some(format!("Exported {}", path.display()));
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    fn upload_with_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "gif", "bmp", "webp"])
            .pick_file()
        {
            self.open_image(path);
        }
    }

    /// Apply a finished background load.
    fn poll_editor(&mut self) {
        let Some(event) = self.editor.poll() else {
            return;
        };
        self.loading_message = None;

        match event {
            LoadEvent::Loaded { label, size } => {
                self.status = Some(format!("Loaded {} ({}x{})", label, size.0, size.1));
            }
            LoadEvent::Failed(e) => {
                self.status = Some(format!("Failed to load image: {}", e));
            }
        }
    }

    /// Re-render the composite if the document changed.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let revision = self.editor.revision();
        if self.texture.is_some() && self.texture_revision == Some(revision) {
            return;
        }

        let surface = self.editor.render();
        let size = [surface.width() as usize, surface.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, surface.as_raw());

        match self.texture {
            Some(ref mut texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("composite", color_image, egui::TextureOptions::LINEAR));
            }
        }
        self.texture_revision = Some(revision);
    }

    fn apply_canvas_action(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::SetOverlaySize(size) => self.editor.set_overlay_size(size),
            CanvasAction::PointerDown(target, pointer) => {
                self.editor.pointer_down(target, pointer);
            }
            CanvasAction::CanvasPointerDown(pointer) => {
                self.editor.canvas_pointer_down(pointer);
            }
            CanvasAction::PointerMove(pointer) => {
                self.editor.pointer_move(pointer);
            }
            CanvasAction::PointerUp => {
                self.editor.pointer_up();
            }
            CanvasAction::UpdateText(id, text) => {
                self.editor
                    .update_caption(id, caption_studio::CaptionUpdate::Text(text));
            }
            CanvasAction::Select(id) => {
                self.editor.select(id);
            }
            CanvasAction::ClickOutside => {
                self.editor.click_outside();
            }
        }
    }

    fn apply_properties_action(&mut self, action: PropertiesAction) {
        match action {
            PropertiesAction::Add => {
                self.editor.add_caption();
            }
            PropertiesAction::Select(id) => {
                self.editor.select(id);
            }
            PropertiesAction::Update(id, update) => {
                self.editor.update_caption(id, update);
            }
            PropertiesAction::Remove(id) => {
                self.editor.remove_caption(id);
            }
        }
    }
}

impl eframe::App for CaptionStudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_editor();

        // Request repaint if still loading (to update spinner)
        if self.editor.is_loading() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        self.upload_with_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Load Snapshot...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Snapshot", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.load_snapshot(path);
                        }
                        ui.close_menu();
                    }
                    ui.menu_button("Save Snapshot", |ui| {
                        if ui.button("Save as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("caption.json")
                                .save_file()
                            {
                                self.save_snapshot(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Save as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("caption.yaml")
                                .save_file()
                            {
                                self.save_snapshot(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui
                        .add_enabled(self.editor.has_background(), egui::Button::new("Export PNG..."))
                        .clicked()
                    {
                        self.export_with_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.button("Add Caption").clicked() {
                        self.editor.add_caption();
                        ui.close_menu();
                    }

                    let selected = self.editor.document().selected_id();
                    if ui
                        .add_enabled(selected.is_some(), egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        if let Some(id) = selected {
                            self.editor.remove_caption(id);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Reset").clicked() {
                        self.editor.reset();
                        self.loading_message = None;
                        self.status = None;
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
                    &self.editor.config().templates,
                    self.editor.has_background(),
                    self.editor.is_loading(),
                )
            })
            .inner;

        match toolbar_action {
            ToolbarAction::Upload => self.upload_with_dialog(),
            ToolbarAction::Template(reference) => self.load_template(&reference),
            ToolbarAction::AddCaption => {
                self.editor.add_caption();
            }
            ToolbarAction::Export => self.export_with_dialog(),
            ToolbarAction::None => {}
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (width, height) = self.editor.document().canvas_size();
                ui.label(format!("Canvas: {}x{}", width, height));
                ui.separator();
                ui.label(format!("Captions: {}", self.editor.document().captions().len()));
                if let Some(ref status) = self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        // Caption panel (right side)
        let properties_actions = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| properties::show(ui, &self.editor))
            .inner;

        for action in properties_actions {
            self.apply_properties_action(action);
        }

        // Handle keyboard events
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.editor.deselect_all();
        }

        // Only process if no text field is focused (to avoid deleting while editing text)
        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace))
        {
            if let Some(id) = self.editor.document().selected_id() {
                self.editor.remove_caption(id);
            }
        }

        self.refresh_texture(ctx);

        // Main canvas (center)
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    Vec::new()
                } else {
                    canvas::show(ui, &self.editor, self.texture.as_ref())
                }
            })
            .inner;

        let changed_before = self.editor.revision();
        for action in canvas_actions {
            self.apply_canvas_action(action);
        }
        if self.editor.revision() != changed_before {
            ctx.request_repaint();
        }
    }
}
