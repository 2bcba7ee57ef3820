// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption typeface: discovery, measurement and glyph coverage masks.
//!
//! Captions use a heavy display face. The first candidate font file that
//! parses is used as-is; otherwise the UI's bundled proportional face is used
//! and thickened by dilating its coverage.

use crate::error::{EditorError, EditorResult};
use ab_glyph::{point, Font, FontArc, FontVec, PxScale, ScaleFont};
use std::path::PathBuf;

/// Widest mask rasterized for one caption. Glyphs past it are dropped.
pub const MAX_MASK_WIDTH: u32 = 8192;

/// Text measurement used by hit-testing and overlay sizing.
pub trait TextMeasure {
    /// Advance width of `text` set at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Coverage mask of a rasterized line of text.
///
/// `origin` is the mask's top-left relative to the text anchor.
#[derive(Debug, Clone)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    pub origin: (i32, i32),
    coverage: Vec<f32>,
}

impl GlyphMask {
    fn new(width: u32, height: u32, origin: (i32, i32)) -> Self {
        Self {
            width,
            height,
            origin,
            coverage: vec![0.0; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.coverage[self.index(x, y)]
    }

    fn accumulate(&mut self, x: i32, y: i32, value: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let slot = self.index(x as u32, y as u32);
        let slot = &mut self.coverage[slot];
        *slot = slot.max(value.clamp(0.0, 1.0));
    }

    /// Morphological dilation with an anti-aliased disc of `radius` pixels.
    /// Round joins fall out of the disc shape.
    pub fn dilate(&self, radius: f32) -> GlyphMask {
        if radius <= 0.0 {
            return self.clone();
        }

        let reach = (radius + 0.5).ceil() as i32;
        let mut kernel = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let distance = ((dx * dx + dy * dy) as f32).sqrt();
                let weight = (radius + 0.5 - distance).clamp(0.0, 1.0);
                if weight > 0.0 {
                    kernel.push((dx, dy, weight));
                }
            }
        }

        let mut out = GlyphMask::new(self.width, self.height, self.origin);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let mut best = 0.0f32;
                for &(dx, dy, weight) in &kernel {
                    let (sx, sy) = (x + dx, y + dy);
                    if sx < 0 || sy < 0 || sx >= self.width as i32 || sy >= self.height as i32 {
                        continue;
                    }
                    best = best.max(self.get(sx as u32, sy as u32) * weight);
                    if best >= 1.0 {
                        break;
                    }
                }
                let slot = out.index(x as u32, y as u32);
                out.coverage[slot] = best;
            }
        }
        out
    }

    /// Number of pixels with any coverage.
    pub fn covered_pixels(&self) -> usize {
        self.coverage.iter().filter(|c| **c > 0.0).count()
    }
}

/// The typeface used to paint and measure captions.
#[derive(Clone)]
pub struct FontFace {
    font: FontArc,
    label: String,
    synthetic_bold: bool,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("label", &self.label)
            .field("synthetic_bold", &self.synthetic_bold)
            .finish()
    }
}

impl FontFace {
    /// Use the first candidate file that parses, else the bundled face.
    pub fn load(candidates: &[PathBuf]) -> EditorResult<Self> {
        for path in candidates {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    log::info!("Using caption font {}", path.display());
                    return Ok(Self {
                        font: FontArc::from(font),
                        label: path.display().to_string(),
                        synthetic_bold: false,
                    });
                }
                Err(e) => log::warn!("Ignoring font {}: {}", path.display(), e),
            }
        }

        log::info!("No display font found, using bundled face with synthetic bold");
        Self::builtin()
    }

    /// The UI toolkit's default proportional face, emboldened.
    pub fn builtin() -> EditorResult<Self> {
        let definitions = egui::FontDefinitions::default();
        let name = definitions
            .families
            .get(&egui::FontFamily::Proportional)
            .and_then(|family| family.first())
            .ok_or_else(|| EditorError::Font("no proportional family".to_string()))?;
        let data = definitions
            .font_data
            .get(name)
            .ok_or_else(|| EditorError::Font(format!("missing font data for {}", name)))?;

        let font = FontVec::try_from_vec_and_index(data.font.to_vec(), data.index)
            .map_err(|e| EditorError::Font(e.to_string()))?;

        Ok(Self {
            font: FontArc::from(font),
            label: name.clone(),
            synthetic_bold: true,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Scale such that `font_size` is the em size, as in CSS `px` fonts.
    fn px_scale(&self, font_size: f64) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(font_size as f32 * self.font.height_unscaled() / units_per_em)
    }

    fn embolden_radius(&self, font_size: f64) -> f32 {
        if self.synthetic_bold {
            (font_size / 40.0) as f32
        } else {
            0.0
        }
    }

    /// Rasterize one line of text, top-left anchored, with room around it for
    /// an outline of up to `outline_radius` pixels.
    pub fn rasterize(&self, text: &str, font_size: f64, outline_radius: f32) -> Option<GlyphMask> {
        if text.is_empty() {
            return None;
        }

        let scaled = self.font.as_scaled(self.px_scale(font_size));
        let embolden = self.embolden_radius(font_size);
        let pad = (outline_radius + embolden).ceil() as i32 + 2;

        let text_width = self.text_width(text, font_size).ceil() as i32;
        let text_height = (scaled.ascent() - scaled.descent()).ceil() as i32;
        let mut mask = GlyphMask::new(
            text_width.saturating_add(2 * pad).clamp(1, MAX_MASK_WIDTH as i32) as u32,
            (text_height + 2 * pad).max(1) as u32,
            (-pad, -pad),
        );

        let mut caret = point(pad as f32, pad as f32 + scaled.ascent());
        let mut previous = None;
        for ch in text.chars() {
            if caret.x > mask.width as f32 {
                break;
            }
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            let mut glyph = scaled.scaled_glyph(ch);
            glyph.position = caret;
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|x, y, coverage| {
                    mask.accumulate(
                        x as i32 + bounds.min.x as i32,
                        y as i32 + bounds.min.y as i32,
                        coverage,
                    );
                });
            }
        }

        Some(if embolden > 0.0 {
            mask.dilate(embolden)
        } else {
            mask
        })
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let scaled = self.font.as_scaled(self.px_scale(font_size));
        let mut width = 0.0f32;
        let mut previous = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width as f64
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character advances by `0.5 * font_size`.
    pub(crate) struct FixedAdvance;

    impl TextMeasure for FixedAdvance {
        fn text_width(&self, text: &str, font_size: f64) -> f64 {
            text.chars().count() as f64 * font_size * 0.5
        }
    }

    #[test]
    fn test_builtin_face_measures_text() {
        let face = FontFace::builtin().unwrap();
        let short = face.text_width("Hi", 40.0);
        let long = face.text_width("Hi there", 40.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert!((face.text_width("Hi", 80.0) - 2.0 * short).abs() < 1.0);
        assert_eq!(face.text_width("", 40.0), 0.0);
    }

    #[test]
    fn test_rasterize_produces_coverage() {
        let face = FontFace::builtin().unwrap();
        assert!(face.rasterize("", 40.0, 2.0).is_none());

        let mask = face.rasterize("TOP", 40.0, 2.0).unwrap();
        assert!(mask.origin.0 < 0 && mask.origin.1 < 0);
        assert!(mask.covered_pixels() > 0);
    }

    #[test]
    fn test_long_caption_mask_is_capped() {
        let face = FontFace::builtin().unwrap();
        let text = "W".repeat(2000);
        assert!(face.text_width(&text, 100.0) > MAX_MASK_WIDTH as f64);

        let mask = face.rasterize(&text, 100.0, 0.0).unwrap();
        assert_eq!(mask.width, MAX_MASK_WIDTH);
        assert!(mask.covered_pixels() > 0);
        let last = mask.get(mask.width - 1, mask.height - 1);
        assert!((0.0..=1.0).contains(&last));
    }

    #[test]
    fn test_dilate_grows_coverage() {
        let mut mask = GlyphMask::new(9, 9, (0, 0));
        mask.accumulate(4, 4, 1.0);
        let grown = mask.dilate(2.0);
        assert!(grown.covered_pixels() > 9);
        assert_eq!(grown.get(4, 4), 1.0);
        assert_eq!(grown.get(0, 0), 0.0);
    }

    #[test]
    fn test_missing_candidates_fall_back() {
        let face = FontFace::load(&[PathBuf::from("/nonexistent/Impact.ttf")]).unwrap();
        assert!(face.synthetic_bold);
    }
}
