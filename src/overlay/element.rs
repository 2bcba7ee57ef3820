// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Screen-space overlay elements, one per caption.

use crate::models::caption::CaptionId;
use crate::util::geometry::Rect;

/// Corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::NorthWest,
        Handle::NorthEast,
        Handle::SouthWest,
        Handle::SouthEast,
    ];

    /// West handles move the left edge, east handles the right edge.
    pub fn is_west(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::SouthWest)
    }

    /// North handles move the top edge, south handles the bottom edge.
    pub fn is_north(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::NorthEast)
    }

    /// Corner position of this handle on `rect`.
    pub fn anchor(self, rect: &Rect) -> (f64, f64) {
        let x = if self.is_west() { rect.x } else { rect.right() };
        let y = if self.is_north() { rect.y } else { rect.bottom() };
        (x, y)
    }
}

/// The interactive part of an overlay element a pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Body(CaptionId),
    Handle(CaptionId, Handle),
    TextField(CaptionId),
    Delete(CaptionId),
}

impl PointerTarget {
    pub fn caption_id(&self) -> CaptionId {
        match *self {
            PointerTarget::Body(id)
            | PointerTarget::Handle(id, _)
            | PointerTarget::TextField(id)
            | PointerTarget::Delete(id) => id,
        }
    }
}

/// Projection of one caption into overlay space.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElement {
    pub id: CaptionId,
    /// Footprint relative to the overlay container's top-left corner.
    pub rect: Rect,
    pub selected: bool,
}
