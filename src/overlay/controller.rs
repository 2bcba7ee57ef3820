// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay interaction state machine.
//!
//! The controller keeps one [`OverlayElement`] per caption, regenerated from
//! the document by [`OverlayController::sync`] after every mutation, and runs
//! the drag/resize gestures. Gestures write canvas-space results back into
//! the document; screen positions are only ever derived from it.

use super::element::{Handle, OverlayElement, PointerTarget};
use crate::models::caption::{clamp_font_size, Caption, CaptionId, CaptionUpdate, LINE_HEIGHT_FACTOR};
use crate::models::document::Document;
use crate::render::font::TextMeasure;
use crate::util::geometry::{CoordinateTransformer, Point, Rect, Size};

/// Smallest overlay element edge, in screen pixels.
pub const DEFAULT_MIN_ELEMENT_SIZE: f64 = 16.0;

/// The single global interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    Idle,
    Dragging {
        id: CaptionId,
        /// Pointer position minus element origin at drag start.
        offset: Point,
    },
    Resizing {
        id: CaptionId,
        handle: Handle,
        start_pointer: Point,
        start_rect: Rect,
        start_font_size: f64,
    },
}

/// What a pointer-down did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Another gesture is active or the target is unknown.
    Ignored,
    Selected(CaptionId),
    DragStarted(CaptionId),
    ResizeStarted(CaptionId),
    Deleted(CaptionId),
}

/// Canvas-space footprint of a caption: the stored size if known, else measured.
pub fn caption_footprint(caption: &Caption, measure: &dyn TextMeasure) -> Size {
    match (caption.width, caption.height) {
        (Some(width), Some(height)) if width > 0.0 && height > 0.0 => Size::new(width, height),
        _ => measured_footprint(caption, measure),
    }
}

/// Footprint of the caption's text as currently set.
pub fn measured_footprint(caption: &Caption, measure: &dyn TextMeasure) -> Size {
    let width = measure.text_width(&caption.text, caption.font_size);
    Size::new(
        width.max(caption.font_size),
        caption.font_size * LINE_HEIGHT_FACTOR,
    )
}

#[derive(Debug, Clone)]
pub struct OverlayController {
    elements: Vec<OverlayElement>,
    interaction: Interaction,
    min_element_size: f64,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ELEMENT_SIZE)
    }
}

impl OverlayController {
    pub fn new(min_element_size: f64) -> Self {
        Self {
            elements: Vec::new(),
            interaction: Interaction::Idle,
            min_element_size: min_element_size.max(1.0),
        }
    }

    pub fn elements(&self) -> &[OverlayElement] {
        &self.elements
    }

    pub fn element(&self, id: CaptionId) -> Option<&OverlayElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_idle(&self) -> bool {
        self.interaction == Interaction::Idle
    }

    /// Regenerate every element from the document's canvas-space state.
    pub fn sync(
        &mut self,
        document: &Document,
        transformer: &CoordinateTransformer,
        measure: &dyn TextMeasure,
    ) {
        let selected = document.selected_id();
        self.elements = document
            .captions()
            .iter()
            .map(|caption| {
                let canvas = Rect::from_origin_size(
                    Point::new(caption.x, caption.y),
                    caption_footprint(caption, measure),
                );
                OverlayElement {
                    id: caption.id,
                    rect: transformer.rect_to_overlay(canvas),
                    selected: selected == Some(caption.id),
                }
            })
            .collect();

        let active = match self.interaction {
            Interaction::Idle => None,
            Interaction::Dragging { id, .. } | Interaction::Resizing { id, .. } => Some(id),
        };
        if let Some(id) = active {
            if self.element(id).is_none() {
                log::debug!("Caption {} vanished mid-gesture, returning to idle", id);
                self.interaction = Interaction::Idle;
            }
        }
    }

    /// Handle a pointer-down on part of an overlay element. `pointer` is in
    /// overlay space. Gestures only start from idle.
    pub fn pointer_down(
        &mut self,
        target: PointerTarget,
        pointer: Point,
        document: &mut Document,
    ) -> PointerOutcome {
        if !self.is_idle() {
            return PointerOutcome::Ignored;
        }

        let id = target.caption_id();
        let Some(element) = self.element(id).cloned() else {
            return PointerOutcome::Ignored;
        };

        match target {
            PointerTarget::Body(_) => {
                document.select(id);
                self.interaction = Interaction::Dragging {
                    id,
                    offset: Point::new(pointer.x - element.rect.x, pointer.y - element.rect.y),
                };
                log::debug!("Dragging caption {}", id);
                PointerOutcome::DragStarted(id)
            }
            PointerTarget::Handle(_, handle) => {
                let Some(caption) = document.caption(id) else {
                    return PointerOutcome::Ignored;
                };
                let start_font_size = caption.font_size;
                document.select(id);
                self.interaction = Interaction::Resizing {
                    id,
                    handle,
                    start_pointer: pointer,
                    start_rect: element.rect,
                    start_font_size,
                };
                log::debug!("Resizing caption {} from {:?}", id, handle);
                PointerOutcome::ResizeStarted(id)
            }
            PointerTarget::TextField(_) => {
                document.select(id);
                PointerOutcome::Selected(id)
            }
            PointerTarget::Delete(_) => {
                document.remove_caption(id);
                PointerOutcome::Deleted(id)
            }
        }
    }

    /// Apply pointer movement to the active gesture. Returns true if the
    /// document changed.
    pub fn pointer_move(
        &mut self,
        pointer: Point,
        document: &mut Document,
        transformer: &CoordinateTransformer,
    ) -> bool {
        let container = transformer.overlay_size();

        match self.interaction {
            Interaction::Idle => false,
            Interaction::Dragging { id, offset } => {
                let Some(element) = self.element(id) else {
                    return false;
                };
                let max_x = (container.width - element.rect.width).max(0.0);
                let max_y = (container.height - element.rect.height).max(0.0);
                let screen = Point::new(
                    (pointer.x - offset.x).clamp(0.0, max_x),
                    (pointer.y - offset.y).clamp(0.0, max_y),
                );

                let canvas = transformer.to_canvas(screen);
                document.update_caption(id, CaptionUpdate::Position { x: canvas.x, y: canvas.y })
            }
            Interaction::Resizing {
                id,
                handle,
                start_pointer,
                start_rect,
                start_font_size,
            } => {
                let rect = self.resized_rect(
                    handle,
                    start_rect,
                    pointer.x - start_pointer.x,
                    pointer.y - start_pointer.y,
                    container,
                );
                let font_size = clamp_font_size(start_font_size * (rect.height / start_rect.height));
                let canvas = transformer.rect_to_canvas(rect);

                document.update_caption(id, CaptionUpdate::Position { x: canvas.x, y: canvas.y });
                document.update_caption(id, CaptionUpdate::FontSize(font_size));
                document.update_caption(
                    id,
                    CaptionUpdate::Footprint {
                        width: canvas.width,
                        height: canvas.height,
                    },
                )
            }
        }
    }

    /// Apply a handle delta to the starting rectangle. Deltas are shrunk at
    /// the container edges and at the minimum element size.
    fn resized_rect(&self, handle: Handle, start: Rect, dx: f64, dy: f64, container: Size) -> Rect {
        let min = self.min_element_size.min(start.width).min(start.height);
        let mut rect = start;

        if handle.is_west() {
            let dx = dx.max(-start.x).min(start.width - min);
            rect.x = start.x + dx;
            rect.width = start.width - dx;
        } else {
            let dx = dx.min(container.width - start.right()).max(min - start.width);
            rect.width = start.width + dx;
        }

        if handle.is_north() {
            let dy = dy.max(-start.y).min(start.height - min);
            rect.y = start.y + dy;
            rect.height = start.height - dy;
        } else {
            let dy = dy.min(container.height - start.bottom()).max(min - start.height);
            rect.height = start.height + dy;
        }

        rect
    }

    /// End the active gesture. Returns true if one was active.
    pub fn pointer_up(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        log::debug!("Gesture finished: {:?}", self.interaction);
        self.interaction = Interaction::Idle;
        true
    }

    /// Abandon any gesture, e.g. when the document is replaced.
    pub fn cancel(&mut self) {
        self.interaction = Interaction::Idle;
    }
}
