// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document model.
//!
//! The document is the single source of truth of an editing session: the
//! background, the ordered captions (order is paint order, last on top),
//! the current selection and the caption id allocator. Every effective
//! mutation bumps [`Document::revision`] so views know when to repaint.

use super::background::Background;
use super::caption::{clamp_font_size, sanitize_color, Caption, CaptionId, CaptionUpdate};
use super::snapshot::{CaptionSnapshot, Snapshot};
use crate::util::geometry::fit_within;
use std::collections::HashSet;

/// Canvas size used before any background has been loaded.
pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (800, 600);

/// Largest canvas edge accepted from a snapshot.
pub const MAX_CANVAS_DIMENSION: u32 = 4096;

/// Restrict a recorded canvas size to [`MAX_CANVAS_DIMENSION`], keeping its aspect.
pub fn limit_canvas_size(size: (u32, u32)) -> (u32, u32) {
    fit_within(size, (MAX_CANVAS_DIMENSION, MAX_CANVAS_DIMENSION))
}

#[derive(Debug, Clone)]
pub struct Document {
    captions: Vec<Caption>,
    background: Option<Background>,
    /// Reference carried by a restored snapshot whose image is not loaded.
    detached_ref: Option<String>,
    canvas_width: u32,
    canvas_height: u32,
    placeholder_size: (u32, u32),
    selected: Option<CaptionId>,
    next_id: CaptionId,
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::with_placeholder_size(DEFAULT_CANVAS_SIZE)
    }

    /// Create an empty document whose canvas is `size` until a background loads.
    pub fn with_placeholder_size(size: (u32, u32)) -> Self {
        let size = (size.0.max(1), size.1.max(1));
        Self {
            captions: Vec::new(),
            background: None,
            detached_ref: None,
            canvas_width: size.0,
            canvas_height: size.1,
            placeholder_size: size,
            selected: None,
            next_id: 1,
            revision: 0,
        }
    }

    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    pub fn caption(&self, id: CaptionId) -> Option<&Caption> {
        self.captions.iter().find(|c| c.id == id)
    }

    pub fn selected_id(&self) -> Option<CaptionId> {
        self.selected
    }

    pub fn selected_caption(&self) -> Option<&Caption> {
        self.selected.and_then(|id| self.caption(id))
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Append a caption with default styling; it becomes topmost and selected.
    pub fn add_caption(&mut self, x: f64, y: f64) -> CaptionId {
        let id = self.next_id;
        self.next_id += 1;

        self.captions.push(Caption::new(id, x, y));
        self.selected = Some(id);
        self.touch();
        log::info!("Added caption {}, total: {}", id, self.captions.len());
        id
    }

    /// Remove a caption. Selection falls back to the first remaining caption.
    /// Returns false if no caption has this id.
    pub fn remove_caption(&mut self, id: CaptionId) -> bool {
        let Some(index) = self.captions.iter().position(|c| c.id == id) else {
            return false;
        };

        self.captions.remove(index);
        if self.selected == Some(id) {
            self.selected = self.captions.first().map(|c| c.id);
        }
        self.touch();
        log::info!("Removed caption {}, total: {}", id, self.captions.len());
        true
    }

    /// Apply a single-field update. Returns false if no caption has this id.
    pub fn update_caption(&mut self, id: CaptionId, update: CaptionUpdate) -> bool {
        let Some(caption) = self.captions.iter_mut().find(|c| c.id == id) else {
            return false;
        };

        match update {
            CaptionUpdate::Text(text) => caption.text = text,
            CaptionUpdate::Position { x, y } => {
                if x.is_finite() {
                    caption.x = x;
                }
                if y.is_finite() {
                    caption.y = y;
                }
            }
            CaptionUpdate::FontSize(size) => caption.font_size = clamp_font_size(size),
            CaptionUpdate::Color(color) => caption.color = sanitize_color(&color),
            CaptionUpdate::Footprint { width, height } => {
                caption.width = Some(width.max(0.0));
                caption.height = Some(height.max(0.0));
            }
        }
        self.touch();
        true
    }

    /// Select a caption. No-op if it is already selected or does not exist.
    pub fn select(&mut self, id: CaptionId) -> bool {
        if self.selected == Some(id) || self.caption(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        self.touch();
        true
    }

    /// Clear the selection. No-op if nothing is selected.
    pub fn deselect_all(&mut self) -> bool {
        if self.selected.take().is_none() {
            return false;
        }
        self.touch();
        true
    }

    /// Replace the background; the canvas takes the fitted image's size.
    pub fn set_background(&mut self, background: Background) {
        let (width, height) = background.size();
        self.canvas_width = width.max(1);
        self.canvas_height = height.max(1);
        self.detached_ref = None;
        log::info!(
            "Background set to {} ({}x{})",
            background.reference.label(),
            width,
            height
        );
        self.background = Some(background);
        self.touch();
    }

    /// Drop the background and any detached reference; the canvas returns to
    /// the placeholder size. Captions are kept.
    pub fn clear_background(&mut self) {
        if self.background.is_none() && self.detached_ref.is_none() {
            return;
        }
        self.background = None;
        self.detached_ref = None;
        self.canvas_width = self.placeholder_size.0;
        self.canvas_height = self.placeholder_size.1;
        self.touch();
        log::info!("Background cleared");
    }

    /// Return to the empty initial state. Ids already handed out stay retired.
    pub fn clear(&mut self) {
        self.captions.clear();
        self.background = None;
        self.detached_ref = None;
        self.canvas_width = self.placeholder_size.0;
        self.canvas_height = self.placeholder_size.1;
        self.selected = None;
        self.touch();
    }

    pub fn background_ref(&self) -> Option<String> {
        self.background
            .as_ref()
            .map(|bg| bg.reference.to_string())
            .or_else(|| self.detached_ref.clone())
    }

    /// Produce the persisted form of the document, captions in paint order.
    pub fn serialize(&self) -> Snapshot {
        Snapshot {
            background_ref: self.background_ref(),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            captions: self
                .captions
                .iter()
                .map(|c| CaptionSnapshot {
                    id: Some(c.id),
                    text: c.text.clone(),
                    x: c.x,
                    y: c.y,
                    font_size: c.font_size,
                    color: c.color.clone(),
                })
                .collect(),
        }
    }

    /// Replace captions and selection from a snapshot.
    ///
    /// A loaded background is kept, and with it the canvas size; otherwise the
    /// snapshot's reference and canvas size are adopted. Captions with a
    /// missing or duplicate id get fresh ones, and the allocator is advanced
    /// past every id seen.
    pub fn deserialize(&mut self, snapshot: &Snapshot) {
        let mut seen = HashSet::new();
        let kept_ids: Vec<Option<CaptionId>> = snapshot
            .captions
            .iter()
            .map(|cs| cs.id.filter(|id| seen.insert(*id)))
            .collect();

        let mut next_id = self.next_id;
        if let Some(max_seen) = seen.iter().max() {
            next_id = next_id.max(max_seen.saturating_add(1));
        }

        let captions: Vec<Caption> = snapshot
            .captions
            .iter()
            .zip(kept_ids)
            .map(|(cs, id)| {
                let id = id.unwrap_or_else(|| {
                    next_id += 1;
                    next_id - 1
                });
                Caption {
                    id,
                    text: cs.text.clone(),
                    x: if cs.x.is_finite() { cs.x } else { 0.0 },
                    y: if cs.y.is_finite() { cs.y } else { 0.0 },
                    font_size: clamp_font_size(cs.font_size),
                    color: sanitize_color(&cs.color),
                    width: None,
                    height: None,
                }
            })
            .collect();

        self.next_id = next_id;
        self.captions = captions;
        self.selected = None;

        if self.background.is_none() {
            self.detached_ref = snapshot.background_ref.clone();
            if snapshot.canvas_width > 0 && snapshot.canvas_height > 0 {
                let (width, height) =
                    limit_canvas_size((snapshot.canvas_width, snapshot.canvas_height));
                self.canvas_width = width;
                self.canvas_height = height;
            }
        }
        self.touch();
        log::info!("Restored {} captions from snapshot", self.captions.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::caption::{MAX_FONT_SIZE, MIN_FONT_SIZE};
    use serde_json::json;

    fn ids(doc: &Document) -> Vec<CaptionId> {
        doc.captions().iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_add_caption_selects_and_appends() {
        let mut doc = Document::new();
        let a = doc.add_caption(10.0, 20.0);
        let b = doc.add_caption(30.0, 40.0);

        assert_ne!(a, b);
        assert_eq!(ids(&doc), vec![a, b]);
        assert_eq!(doc.selected_id(), Some(b));
        let caption = doc.caption(b).unwrap();
        assert_eq!((caption.x, caption.y), (30.0, 40.0));
        assert_eq!(caption.text, "New Text");
    }

    #[test]
    fn test_ids_never_reused() {
        let mut doc = Document::new();
        let mut live = Vec::new();
        for i in 0..20 {
            live.push(doc.add_caption(i as f64, 0.0));
            if i % 3 == 0 {
                let victim = live.remove(0);
                doc.remove_caption(victim);
            }
        }
        let mut current = ids(&doc);
        current.sort_unstable();
        current.dedup();
        assert_eq!(current.len(), doc.captions().len());

        let fresh = doc.add_caption(0.0, 0.0);
        assert!(fresh > *live.iter().max().unwrap());
    }

    #[test]
    fn test_add_then_remove_restores_sequence() {
        let mut doc = Document::new();
        doc.add_caption(1.0, 1.0);
        doc.add_caption(2.0, 2.0);
        let before = doc.captions().to_vec();

        let id = doc.add_caption(5.0, 5.0);
        assert!(doc.remove_caption(id));
        assert_eq!(doc.captions(), before.as_slice());
    }

    #[test]
    fn test_remove_moves_selection_to_first() {
        let mut doc = Document::new();
        let a = doc.add_caption(0.0, 0.0);
        let b = doc.add_caption(0.0, 0.0);
        assert_eq!(doc.selected_id(), Some(b));

        doc.remove_caption(b);
        assert_eq!(doc.selected_id(), Some(a));
        doc.remove_caption(a);
        assert_eq!(doc.selected_id(), None);
        assert!(!doc.remove_caption(a));
    }

    #[test]
    fn test_remove_unselected_keeps_selection() {
        let mut doc = Document::new();
        let a = doc.add_caption(0.0, 0.0);
        let b = doc.add_caption(0.0, 0.0);
        doc.remove_caption(a);
        assert_eq!(doc.selected_id(), Some(b));
    }

    #[test]
    fn test_update_clamps_and_sanitizes() {
        let mut doc = Document::new();
        let id = doc.add_caption(0.0, 0.0);

        doc.update_caption(id, CaptionUpdate::FontSize(500.0));
        assert_eq!(doc.caption(id).unwrap().font_size, MAX_FONT_SIZE);
        doc.update_caption(id, CaptionUpdate::FontSize(1.0));
        assert_eq!(doc.caption(id).unwrap().font_size, MIN_FONT_SIZE);

        doc.update_caption(id, CaptionUpdate::Color("#00FF00".into()));
        assert_eq!(doc.caption(id).unwrap().color, "#00FF00");
        doc.update_caption(id, CaptionUpdate::Color(String::new()));
        assert_eq!(doc.caption(id).unwrap().color, "#FFFFFF");

        assert!(!doc.update_caption(999, CaptionUpdate::Text("x".into())));
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut doc = Document::new();
        let a = doc.add_caption(0.0, 0.0);
        let rev = doc.revision();

        assert!(!doc.select(a));
        assert_eq!(doc.revision(), rev);
        assert!(!doc.select(42));

        assert!(doc.deselect_all());
        assert!(!doc.deselect_all());
        assert!(doc.select(a));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "backgroundRef": "https://example.com/a.jpg",
            "canvasWidth": 640,
            "canvasHeight": 480,
            "captions": [
                { "id": 3, "text": "top", "x": 12.25, "y": 7.5, "fontSize": 52.0, "color": "#FF0000" },
                { "id": 9, "text": "", "x": 0.0, "y": 300.0, "fontSize": 20.0, "color": "#FFFFFF" }
            ]
        }))
        .unwrap();

        let mut doc = Document::new();
        doc.deserialize(&snapshot);
        assert_eq!(doc.serialize(), snapshot);
    }

    #[test]
    fn test_deserialize_defaults_and_advances_ids() {
        let snapshot: Snapshot =
            serde_json::from_value(json!({ "captions": [{ "id": 5, "text": "x" }] })).unwrap();

        let mut doc = Document::new();
        doc.deserialize(&snapshot);

        let caption = doc.caption(5).unwrap();
        assert_eq!(caption.font_size, 40.0);
        assert_eq!(caption.color, "#FFFFFF");
        assert_eq!((caption.x, caption.y), (0.0, 0.0));
        assert_eq!(doc.canvas_size(), DEFAULT_CANVAS_SIZE);

        assert!(doc.add_caption(0.0, 0.0) >= 6);
    }

    #[test]
    fn test_deserialize_repairs_ids_and_ranges() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "captions": [
                { "id": 4, "fontSize": 900, "color": "blue" },
                { "id": 4, "text": "dup" },
                { "text": "no id" }
            ]
        }))
        .unwrap();

        let mut doc = Document::new();
        doc.deserialize(&snapshot);

        let all = ids(&doc);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], 4);
        assert!(all[1] > 4 && all[2] > 4 && all[1] != all[2]);
        assert_eq!(doc.captions()[0].font_size, 100.0);
        assert_eq!(doc.captions()[0].color, "#FFFFFF");
    }

    #[test]
    fn test_clear_resets_to_placeholder() {
        let mut doc = Document::with_placeholder_size((400, 300));
        doc.add_caption(0.0, 0.0);
        doc.clear();
        assert!(doc.captions().is_empty());
        assert_eq!(doc.selected_id(), None);
        assert_eq!(doc.canvas_size(), (400, 300));
        assert!(!doc.has_background());
    }

    #[test]
    fn test_oversized_canvas_is_limited() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "canvasWidth": 4294967295u64,
            "canvasHeight": 4294967295u64,
            "captions": []
        }))
        .unwrap();

        let mut doc = Document::new();
        doc.deserialize(&snapshot);
        assert_eq!(doc.canvas_size(), (MAX_CANVAS_DIMENSION, MAX_CANVAS_DIMENSION));

        assert_eq!(limit_canvas_size((8192, 2048)), (4096, 1024));
        assert_eq!(limit_canvas_size((640, 480)), (640, 480));
    }

    #[test]
    fn test_clear_background_keeps_captions() {
        let mut doc = Document::with_placeholder_size((400, 300));
        let snapshot: Snapshot = serde_json::from_value(json!({
            "backgroundRef": "https://example.com/a.jpg",
            "canvasWidth": 640,
            "canvasHeight": 480,
            "captions": [{ "id": 1, "text": "kept" }]
        }))
        .unwrap();
        doc.deserialize(&snapshot);
        let rev = doc.revision();

        doc.clear_background();
        assert!(doc.revision() > rev);
        assert_eq!(doc.background_ref(), None);
        assert_eq!(doc.canvas_size(), (400, 300));
        assert_eq!(doc.captions().len(), 1);

        let rev = doc.revision();
        doc.clear_background();
        assert_eq!(doc.revision(), rev);
    }
}
