// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The editor handle.
//!
//! [`Editor`] owns the document, the coordinate transformer, the overlay
//! controller and the renderer, and is the one object a host UI or a
//! publishing collaborator talks to. Data flows one way: every mutation goes
//! into the document first, then the overlay is re-projected from it.

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::io::background::{decode_background, spawn_decode, BackgroundKind, FitTarget};
use crate::io::export::encode_png;
use crate::models::background::{Background, BackgroundRef};
use crate::models::caption::{CaptionId, CaptionUpdate};
use crate::models::document::{limit_canvas_size, Document};
use crate::models::snapshot::Snapshot;
use crate::overlay::controller::{measured_footprint, OverlayController, PointerOutcome};
use crate::overlay::element::PointerTarget;
use crate::render::engine::Renderer;
use crate::render::font::FontFace;
use crate::render::hit_test::caption_at;
use crate::util::geometry::{CoordinateTransformer, Point, Size};
use image::RgbaImage;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Re-edit request: a background reference plus the captions to restore.
#[derive(Debug, Clone, Default)]
pub struct LoadStateRequest {
    /// Overrides the snapshot's own `backgroundRef` when set.
    pub image_url: Option<String>,
    pub canvas_state: Snapshot,
}

/// Completion of an asynchronous background load.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded { label: String, size: (u32, u32) },
    Failed(EditorError),
}

/// What a pointer-down on the bare canvas did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasOutcome {
    /// Landed on a caption: it is selected and being dragged.
    Hit(PointerOutcome),
    Added(CaptionId),
    Deselected,
    Ignored,
}

struct PendingLoad {
    receiver: Receiver<EditorResult<Background>>,
    restore: Option<Snapshot>,
}

pub struct Editor {
    config: EditorConfig,
    document: Document,
    transformer: CoordinateTransformer,
    overlay: OverlayController,
    renderer: Renderer,
    pending: Option<PendingLoad>,
}

impl Editor {
    /// Create an editor with an empty document.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        let font = FontFace::load(&config.font_paths)?;
        Ok(Self::with_font(config, font))
    }

    pub fn with_font(config: EditorConfig, font: FontFace) -> Self {
        let document = Document::with_placeholder_size(config.placeholder_size.as_tuple());
        let transformer = CoordinateTransformer::new(document.canvas_size(), Size::default());
        let overlay = OverlayController::new(config.min_overlay_size);

        Self {
            config,
            document,
            transformer,
            overlay,
            renderer: Renderer::new(font),
            pending: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn transformer(&self) -> &CoordinateTransformer {
        &self.transformer
    }

    /// Changes whenever the document does; hosts repaint when it moves.
    pub fn revision(&self) -> u64 {
        self.document.revision()
    }

    /// Re-derive canvas scale and overlay positions from the document.
    fn resync(&mut self) {
        let (width, height) = self.document.canvas_size();
        self.transformer.set_canvas_size(width, height);
        self.overlay
            .sync(&self.document, &self.transformer, self.renderer.font());
    }

    // ---- publishing interface -------------------------------------------

    /// Clear the document back to its empty initial state.
    pub fn reset(&mut self) {
        self.pending = None;
        self.overlay.cancel();
        self.document.clear();
        self.resync();
        log::info!("Editor reset");
    }

    pub fn has_background(&self) -> bool {
        self.document.has_background()
    }

    /// Render the composite and encode it as PNG. Requires a background.
    pub fn export_blob(&self) -> EditorResult<Vec<u8>> {
        if !self.has_background() {
            return Err(EditorError::NoBackground);
        }
        encode_png(&self.render())
    }

    pub fn get_state(&self) -> Snapshot {
        self.document.serialize()
    }

    /// Start re-editing a previously exported document. The background is
    /// loaded first; the captions are restored once it has been applied.
    pub fn load_state(&mut self, request: LoadStateRequest) {
        let LoadStateRequest {
            image_url,
            canvas_state,
        } = request;

        match image_url.or_else(|| canvas_state.background_ref.clone()) {
            Some(reference) => {
                let target = self.restore_target(&canvas_state);
                let receiver = spawn_decode(BackgroundRef::parse(&reference), target);
                self.pending = Some(PendingLoad {
                    receiver,
                    restore: Some(canvas_state),
                });
            }
            None => {
                self.pending = None;
                self.document.clear_background();
                self.restore(&canvas_state);
            }
        }
    }

    /// Blocking variant of [`Editor::load_state`]. On failure nothing changes.
    pub fn load_state_blocking(&mut self, request: LoadStateRequest) -> EditorResult<()> {
        let LoadStateRequest {
            image_url,
            canvas_state,
        } = request;

        if let Some(reference) = image_url.or_else(|| canvas_state.background_ref.clone()) {
            let target = self.restore_target(&canvas_state);
            let background = decode_background(BackgroundRef::parse(&reference), target)?;
            self.pending = None;
            self.apply_background(background);
        } else {
            self.pending = None;
            self.document.clear_background();
        }
        self.restore(&canvas_state);
        Ok(())
    }

    /// Captions are positioned in the snapshot's canvas space, so the
    /// background is sized to it when it is known, within the canvas limit.
    fn restore_target(&self, snapshot: &Snapshot) -> FitTarget {
        if snapshot.canvas_width > 0 && snapshot.canvas_height > 0 {
            FitTarget::Exact(limit_canvas_size((snapshot.canvas_width, snapshot.canvas_height)))
        } else {
            FitTarget::Within(self.config.upload_box.as_tuple())
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.overlay.cancel();
        self.document.deserialize(snapshot);
        self.refresh_all_footprints();
        self.resync();
    }

    // ---- background loading --------------------------------------------

    fn fit_target(&self, kind: BackgroundKind) -> FitTarget {
        match kind {
            BackgroundKind::Upload => FitTarget::Within(self.config.upload_box.as_tuple()),
            BackgroundKind::Template => FitTarget::Within(self.config.template_box.as_tuple()),
        }
    }

    /// Start decoding a background. A pending load is superseded.
    pub fn load_background(&mut self, reference: BackgroundRef, kind: BackgroundKind) {
        if self.pending.is_some() {
            log::debug!("Superseding pending background load");
        }
        let receiver = spawn_decode(reference, self.fit_target(kind));
        self.pending = Some(PendingLoad {
            receiver,
            restore: None,
        });
    }

    /// Decode and apply a background on the calling thread.
    pub fn load_background_blocking(
        &mut self,
        reference: BackgroundRef,
        kind: BackgroundKind,
    ) -> EditorResult<()> {
        let background = decode_background(reference, self.fit_target(kind))?;
        self.pending = None;
        self.apply_background(background);
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a finished background load, if any. Call once per frame.
    pub fn poll(&mut self) -> Option<LoadEvent> {
        let received = match self.pending.as_ref()?.receiver.try_recv() {
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(EditorError::LoadCancelled),
            Ok(result) => result,
        };
        let pending = self.pending.take()?;

        match received {
            Ok(background) => {
                let label = background.reference.label();
                self.apply_background(background);
                if let Some(snapshot) = pending.restore {
                    self.restore(&snapshot);
                }
                Some(LoadEvent::Loaded {
                    label,
                    size: self.document.canvas_size(),
                })
            }
            Err(e) => {
                log::warn!("Background load failed, keeping previous background: {}", e);
                Some(LoadEvent::Failed(e))
            }
        }
    }

    fn apply_background(&mut self, background: Background) {
        self.document.set_background(background);
        self.resync();
    }

    // ---- caption commands -----------------------------------------------

    /// Add a caption near the middle of the canvas.
    pub fn add_caption(&mut self) -> CaptionId {
        let (width, height) = self.document.canvas_size();
        let x = (width as f64 / 2.0 - 100.0).max(0.0);
        let y = height as f64 / 2.0;
        self.add_caption_at(x, y)
    }

    /// Add a caption at a canvas-space position.
    pub fn add_caption_at(&mut self, x: f64, y: f64) -> CaptionId {
        let id = self.document.add_caption(x, y);
        self.refresh_footprint(id);
        self.resync();
        id
    }

    pub fn remove_caption(&mut self, id: CaptionId) -> bool {
        let removed = self.document.remove_caption(id);
        if removed {
            self.resync();
        }
        removed
    }

    /// Update one field. Text and font size changes re-measure the footprint.
    pub fn update_caption(&mut self, id: CaptionId, update: CaptionUpdate) -> bool {
        let remeasure = matches!(update, CaptionUpdate::Text(_) | CaptionUpdate::FontSize(_));
        if !self.document.update_caption(id, update) {
            return false;
        }
        if remeasure {
            self.refresh_footprint(id);
        }
        self.resync();
        true
    }

    fn refresh_footprint(&mut self, id: CaptionId) {
        let Some(caption) = self.document.caption(id) else {
            return;
        };
        let size = measured_footprint(caption, self.renderer.font());
        self.document.update_caption(
            id,
            CaptionUpdate::Footprint {
                width: size.width,
                height: size.height,
            },
        );
    }

    fn refresh_all_footprints(&mut self) {
        let ids: Vec<CaptionId> = self.document.captions().iter().map(|c| c.id).collect();
        for id in ids {
            self.refresh_footprint(id);
        }
    }

    pub fn select(&mut self, id: CaptionId) -> bool {
        let changed = self.document.select(id);
        if changed {
            self.resync();
        }
        changed
    }

    pub fn deselect_all(&mut self) -> bool {
        let changed = self.document.deselect_all();
        if changed {
            self.resync();
        }
        changed
    }

    // ---- pointer input (overlay space) ----------------------------------

    /// The overlay container was laid out at `size` screen pixels.
    pub fn set_overlay_size(&mut self, size: Size) {
        if self.transformer.set_overlay_size(size) {
            log::debug!(
                "Overlay scale now {:.3}x{:.3}",
                self.transformer.scale_x(),
                self.transformer.scale_y()
            );
            self.resync();
        }
    }

    pub fn pointer_down(&mut self, target: PointerTarget, pointer: Point) -> PointerOutcome {
        let outcome = self.overlay.pointer_down(target, pointer, &mut self.document);
        if outcome != PointerOutcome::Ignored {
            self.resync();
        }
        outcome
    }

    /// Pointer-down on the canvas itself, outside every overlay element.
    pub fn canvas_pointer_down(&mut self, pointer: Point) -> CanvasOutcome {
        if !self.overlay.is_idle() {
            return CanvasOutcome::Ignored;
        }

        let canvas_point = self.transformer.to_canvas(pointer);
        let hit = caption_at(
            &self.document,
            self.renderer.font(),
            canvas_point,
            self.config.hit_tolerance,
        );

        match hit {
            Some(id) => CanvasOutcome::Hit(self.pointer_down(PointerTarget::Body(id), pointer)),
            None if self.config.click_to_add => {
                CanvasOutcome::Added(self.add_caption_at(canvas_point.x, canvas_point.y))
            }
            None => {
                if self.deselect_all() {
                    CanvasOutcome::Deselected
                } else {
                    CanvasOutcome::Ignored
                }
            }
        }
    }

    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let changed = self
            .overlay
            .pointer_move(pointer, &mut self.document, &self.transformer);
        if changed {
            self.resync();
        }
        changed
    }

    pub fn pointer_up(&mut self) -> bool {
        self.overlay.pointer_up()
    }

    /// A click landed outside the canvas, the overlay and the control panel.
    pub fn click_outside(&mut self) -> bool {
        if !self.overlay.is_idle() {
            return false;
        }
        self.deselect_all()
    }

    /// Paint the current composite at canvas resolution.
    pub fn render(&self) -> RgbaImage {
        self.renderer.render(&self.document)
    }
}
