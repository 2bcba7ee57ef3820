// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas display and the interactive caption overlay.
//!
//! The rendered composite is shown scaled to fit the available space. On top
//! of it sits one overlay element per caption: a draggable body, four corner
//! resize handles, a delete button and an inline text field for the selected
//! caption. Everything the user does is reported back as [`CanvasAction`]s.

use caption_studio::models::caption::CaptionId;
use caption_studio::overlay::element::{Handle, OverlayElement, PointerTarget};
use caption_studio::util::geometry::{Point, Size};
use caption_studio::Editor;

const HANDLE_SIZE: f32 = 10.0;
const DELETE_RADIUS: f32 = 8.0;
const TEXT_FIELD_MIN_WIDTH: f32 = 140.0;

/// Result of canvas interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    /// The overlay container was laid out at this size.
    SetOverlaySize(Size),
    PointerDown(PointerTarget, Point),
    /// Pointer went down on the canvas away from every overlay element.
    CanvasPointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Plain click on an element body: select without starting a gesture.
    Select(CaptionId),
    UpdateText(CaptionId, String),
    /// Click landed next to the canvas, not on it.
    ClickOutside,
}

/// Display the canvas and overlay, returning what the user did this frame.
pub fn show(
    ui: &mut egui::Ui,
    editor: &Editor,
    texture: Option<&egui::TextureHandle>,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);
        let frame_rect = ui.min_rect();

        let Some(texture) = texture else {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        };

        // Fit the canvas into the available space, never enlarging it
        let (canvas_width, canvas_height) = editor.document().canvas_size();
        let scale = (frame_rect.width() / canvas_width as f32)
            .min(frame_rect.height() / canvas_height as f32)
            .min(1.0);
        let display_size = egui::vec2(canvas_width as f32 * scale, canvas_height as f32 * scale);
        let image_rect = egui::Rect::from_center_size(frame_rect.center(), display_size);

        actions.push(CanvasAction::SetOverlaySize(Size::new(
            display_size.x as f64,
            display_size.y as f64,
        )));

        // Clicks beside the canvas
        let outside = ui.interact(
            frame_rect,
            egui::Id::new("canvas_surround"),
            egui::Sense::click(),
        );
        if outside.clicked() {
            let on_canvas = outside
                .interact_pointer_pos()
                .map(|pos| image_rect.contains(pos))
                .unwrap_or(false);
            if !on_canvas {
                actions.push(CanvasAction::ClickOutside);
            }
        }

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let to_overlay = |pos: egui::Pos2| {
            Point::new((pos.x - image_rect.min.x) as f64, (pos.y - image_rect.min.y) as f64)
        };
        let press_origin = ui.input(|i| i.pointer.press_origin());

        // Bare canvas, below every overlay element
        let canvas_response = ui.interact(
            image_rect,
            egui::Id::new("canvas_surface"),
            egui::Sense::click_and_drag(),
        );
        if canvas_response.drag_started() {
            if let Some(pos) = press_origin {
                actions.push(CanvasAction::CanvasPointerDown(to_overlay(pos)));
            }
        } else if canvas_response.clicked() {
            if let Some(pos) = canvas_response.interact_pointer_pos() {
                actions.push(CanvasAction::CanvasPointerDown(to_overlay(pos)));
                actions.push(CanvasAction::PointerUp);
            }
        }

        for element in editor.overlay().elements() {
            let rect = screen_rect(element, image_rect.min);
            show_element(ui, editor, element, rect, press_origin.map(to_overlay), &mut actions);
        }

        // Feed the active gesture
        if !editor.overlay().is_idle() {
            let (pointer, released) =
                ui.input(|i| (i.pointer.interact_pos(), i.pointer.any_released()));
            if let Some(pos) = pointer {
                actions.push(CanvasAction::PointerMove(to_overlay(pos)));
            }
            if released {
                actions.push(CanvasAction::PointerUp);
            }
        }
    });

    actions
}

fn screen_rect(element: &OverlayElement, origin: egui::Pos2) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(element.rect.x as f32, element.rect.y as f32),
        egui::vec2(element.rect.width as f32, element.rect.height as f32),
    )
}

fn show_element(
    ui: &mut egui::Ui,
    editor: &Editor,
    element: &OverlayElement,
    rect: egui::Rect,
    press_origin: Option<Point>,
    actions: &mut Vec<CanvasAction>,
) {
    let id = element.id;
    let accent = egui::Color32::from_rgb(0x3B, 0x82, 0xF6);
    let stroke = if element.selected {
        egui::Stroke::new(1.5, accent)
    } else {
        egui::Stroke::new(1.0, egui::Color32::from_white_alpha(90))
    };
    ui.painter().rect_stroke(rect, 2.0, stroke);

    let body = ui
        .interact(rect, egui::Id::new(("caption_body", id)), egui::Sense::click_and_drag())
        .on_hover_cursor(egui::CursorIcon::Grab);
    actions.extend(body_action(id, body.drag_started(), body.clicked(), press_origin));

    if !element.selected {
        return;
    }

    for handle in Handle::ALL {
        let (x, y) = handle.anchor(&element.rect);
        let center = rect.min + egui::vec2((x - element.rect.x) as f32, (y - element.rect.y) as f32);
        let handle_rect = egui::Rect::from_center_size(center, egui::Vec2::splat(HANDLE_SIZE));

        ui.painter().rect_filled(handle_rect, 1.0, egui::Color32::WHITE);
        ui.painter().rect_stroke(handle_rect, 1.0, egui::Stroke::new(1.0, accent));

        let response = ui
            .interact(
                handle_rect,
                egui::Id::new(("caption_handle", id, handle)),
                egui::Sense::drag(),
            )
            .on_hover_cursor(handle_cursor(handle));
        if response.drag_started() {
            if let Some(pointer) = press_origin {
                actions.push(CanvasAction::PointerDown(PointerTarget::Handle(id, handle), pointer));
            }
        }
    }

    let delete_center = rect.right_top() + egui::vec2(DELETE_RADIUS + 4.0, -(DELETE_RADIUS + 4.0));
    let delete_rect = egui::Rect::from_center_size(delete_center, egui::Vec2::splat(DELETE_RADIUS * 2.0));
    let delete = ui
        .interact(delete_rect, egui::Id::new(("caption_delete", id)), egui::Sense::click())
        .on_hover_text("Remove caption");
    let fill = if delete.hovered() {
        egui::Color32::from_rgb(0xDC, 0x26, 0x26)
    } else {
        egui::Color32::from_rgb(0xEF, 0x44, 0x44)
    };
    ui.painter().circle_filled(delete_center, DELETE_RADIUS, fill);
    ui.painter().text(
        delete_center,
        egui::Align2::CENTER_CENTER,
        "×",
        egui::FontId::proportional(13.0),
        egui::Color32::WHITE,
    );
    if delete.clicked() {
        actions.push(CanvasAction::PointerDown(PointerTarget::Delete(id), Point::default()));
        return;
    }

    // Inline text field under the element
    let Some(caption) = editor.document().caption(id) else {
        return;
    };
    let mut text = caption.text.clone();
    let field_rect = egui::Rect::from_min_size(
        rect.left_bottom() + egui::vec2(0.0, 6.0),
        egui::vec2(rect.width().max(TEXT_FIELD_MIN_WIDTH), 20.0),
    );
    let field = ui.put(
        field_rect,
        egui::TextEdit::singleline(&mut text)
            .id(egui::Id::new(("caption_text", id)))
            .hint_text("Caption text"),
    );
    if field.gained_focus() {
        actions.push(CanvasAction::PointerDown(PointerTarget::TextField(id), Point::default()));
    }
    if field.changed() {
        actions.push(CanvasAction::UpdateText(id, text));
    }
}

/// A drag on the body starts moving the caption; a click only selects it.
fn body_action(
    id: CaptionId,
    drag_started: bool,
    clicked: bool,
    press_origin: Option<Point>,
) -> Option<CanvasAction> {
    if drag_started {
        press_origin.map(|pointer| CanvasAction::PointerDown(PointerTarget::Body(id), pointer))
    } else if clicked {
        Some(CanvasAction::Select(id))
    } else {
        None
    }
}

fn handle_cursor(handle: Handle) -> egui::CursorIcon {
    match handle {
        Handle::NorthWest => egui::CursorIcon::ResizeNorthWest,
        Handle::NorthEast => egui::CursorIcon::ResizeNorthEast,
        Handle::SouthWest => egui::CursorIcon::ResizeSouthWest,
        Handle::SouthEast => egui::CursorIcon::ResizeSouthEast,
    }
}
