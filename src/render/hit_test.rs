// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Locating captions under a canvas-space point.
//!
//! This is the fallback path for pointer events that land on the bare
//! canvas rather than on an overlay element.

use super::font::TextMeasure;
use crate::models::caption::{Caption, CaptionId, LINE_HEIGHT_FACTOR};
use crate::models::document::Document;
use crate::util::geometry::{Point, Rect};

/// Extra hit area around each caption, in canvas pixels.
pub const DEFAULT_HIT_TOLERANCE: f64 = 10.0;

/// Measured text box of a caption. `None` for empty captions.
pub fn caption_bounds(caption: &Caption, measure: &dyn TextMeasure) -> Option<Rect> {
    if caption.text.is_empty() {
        return None;
    }
    Some(Rect::new(
        caption.x,
        caption.y,
        measure.text_width(&caption.text, caption.font_size),
        caption.font_size * LINE_HEIGHT_FACTOR,
    ))
}

/// Topmost caption whose padded text box contains `point`.
pub fn caption_at(
    document: &Document,
    measure: &dyn TextMeasure,
    point: Point,
    tolerance: f64,
) -> Option<CaptionId> {
    document
        .captions()
        .iter()
        .rev()
        .find(|caption| {
            caption_bounds(caption, measure)
                .map(|bounds| bounds.expand(tolerance).contains(point))
                .unwrap_or(false)
        })
        .map(|caption| caption.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::caption::CaptionUpdate;
    use crate::render::font::tests::FixedAdvance;

    fn doc_with(captions: &[(&str, f64, f64)]) -> (Document, Vec<CaptionId>) {
        let mut doc = Document::new();
        let ids = captions
            .iter()
            .map(|(text, x, y)| {
                let id = doc.add_caption(*x, *y);
                doc.update_caption(id, CaptionUpdate::Text(text.to_string()));
                id
            })
            .collect();
        (doc, ids)
    }

    #[test]
    fn test_hit_inside_and_tolerance() {
        // "abcd" at 40px is 80 wide and 48 tall with the fixed measurer.
        let (doc, ids) = doc_with(&[("abcd", 100.0, 100.0)]);
        let hit = |x, y| caption_at(&doc, &FixedAdvance, Point::new(x, y), DEFAULT_HIT_TOLERANCE);

        assert_eq!(hit(120.0, 120.0), Some(ids[0]));
        assert_eq!(hit(91.0, 95.0), Some(ids[0]));
        assert_eq!(hit(189.0, 157.0), Some(ids[0]));
        assert_eq!(hit(189.0, 159.0), None);
        assert_eq!(hit(85.0, 120.0), None);
    }

    #[test]
    fn test_topmost_wins() {
        let (doc, ids) = doc_with(&[("bottom", 0.0, 0.0), ("top", 10.0, 10.0)]);
        let hit = caption_at(&doc, &FixedAdvance, Point::new(20.0, 20.0), 10.0);
        assert_eq!(hit, Some(ids[1]));
    }

    #[test]
    fn test_empty_caption_is_not_hittable() {
        let (doc, ids) = doc_with(&[("under", 0.0, 0.0), ("", 0.0, 0.0)]);
        let hit = caption_at(&doc, &FixedAdvance, Point::new(5.0, 5.0), 10.0);
        assert_eq!(hit, Some(ids[0]));
        assert!(caption_bounds(doc.caption(ids[1]).unwrap(), &FixedAdvance).is_none());
    }

    #[test]
    fn test_no_captions() {
        let doc = Document::new();
        assert_eq!(caption_at(&doc, &FixedAdvance, Point::new(0.0, 0.0), 10.0), None);
    }
}
