// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Compositing of the background and captions into a raster surface.
//!
//! Every call repaints the whole surface from the document; caption counts
//! are small, so there is no invalidation tracking.

use super::font::{FontFace, GlyphMask};
use crate::models::caption::Caption;
use crate::models::document::Document;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

const PLACEHOLDER_FILL: [u8; 4] = [0xF0, 0xF0, 0xF0, 0xFF];
const PLACEHOLDER_TEXT: [u8; 3] = [0x99, 0x99, 0x99];
const PLACEHOLDER_MESSAGE: &str = "Upload an image to get started";
const PLACEHOLDER_FONT_SIZE: f64 = 24.0;
const OUTLINE_COLOR: [u8; 3] = [0, 0, 0];

/// Outline stroke width for a caption at `font_size`.
pub fn outline_width(font_size: f64) -> f64 {
    (font_size / 12.0).max(4.0)
}

pub struct Renderer {
    font: FontFace,
}

impl Renderer {
    pub fn new(font: FontFace) -> Self {
        Self { font }
    }

    pub fn font(&self) -> &FontFace {
        &self.font
    }

    /// Paint the full composite at canvas resolution.
    pub fn render(&self, document: &Document) -> RgbaImage {
        let (width, height) = document.canvas_size();
        let mut surface = RgbaImage::new(width, height);

        match document.background() {
            Some(background) => {
                if background.image.dimensions() == (width, height) {
                    imageops::replace(&mut surface, &background.image, 0, 0);
                } else {
                    let fitted = imageops::resize(&background.image, width, height, FilterType::Triangle);
                    imageops::replace(&mut surface, &fitted, 0, 0);
                }
            }
            None => self.paint_placeholder(&mut surface),
        }

        for caption in document.captions() {
            self.paint_caption(&mut surface, caption);
        }

        log::debug!(
            "Rendered {}x{} surface with {} captions",
            width,
            height,
            document.captions().len()
        );
        surface
    }

    fn paint_placeholder(&self, surface: &mut RgbaImage) {
        for pixel in surface.pixels_mut() {
            *pixel = Rgba(PLACEHOLDER_FILL);
        }

        let Some(mask) = self.font.rasterize(PLACEHOLDER_MESSAGE, PLACEHOLDER_FONT_SIZE, 0.0) else {
            return;
        };
        let text_width = mask.width as i32 + 2 * mask.origin.0;
        let text_height = mask.height as i32 + 2 * mask.origin.1;
        let x = (surface.width() as i32 - text_width) / 2;
        let y = (surface.height() as i32 - text_height) / 2;
        composite_mask(surface, &mask, x, y, PLACEHOLDER_TEXT);
    }

    /// Outline pass in black, then fill pass in the caption color.
    fn paint_caption(&self, surface: &mut RgbaImage, caption: &Caption) {
        if caption.text.is_empty() {
            return;
        }

        let radius = (outline_width(caption.font_size) / 2.0) as f32;
        let Some(fill) = self.font.rasterize(&caption.text, caption.font_size, radius) else {
            return;
        };
        let outline = fill.dilate(radius);

        let x = caption.x.round() as i32;
        let y = caption.y.round() as i32;
        composite_mask(surface, &outline, x, y, OUTLINE_COLOR);
        composite_mask(surface, &fill, x, y, caption.rgb());
    }
}

/// Source-over blend of `color` through `mask`, anchored at (`x`, `y`).
fn composite_mask(surface: &mut RgbaImage, mask: &GlyphMask, x: i32, y: i32, color: [u8; 3]) {
    let left = x + mask.origin.0;
    let top = y + mask.origin.1;

    for my in 0..mask.height {
        let py = top + my as i32;
        if py < 0 || py >= surface.height() as i32 {
            continue;
        }
        for mx in 0..mask.width {
            let px = left + mx as i32;
            if px < 0 || px >= surface.width() as i32 {
                continue;
            }
            let coverage = mask.get(mx, my);
            if coverage > 0.0 {
                blend_pixel(surface, px as u32, py as u32, color, coverage);
            }
        }
    }
}

fn blend_pixel(surface: &mut RgbaImage, x: u32, y: u32, color: [u8; 3], alpha: f32) {
    let dst = surface.get_pixel(x, y).0;
    let src_a = alpha.clamp(0.0, 1.0);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }
    let blend = |src: u8, dst: u8| {
        let src_f = src as f32 / 255.0;
        let dst_f = dst as f32 / 255.0;
        ((src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    surface.put_pixel(
        x,
        y,
        Rgba([
            blend(color[0], dst[0]),
            blend(color[1], dst[1]),
            blend(color[2], dst[2]),
            (out_a * 255.0).round() as u8,
        ]),
    );
}
