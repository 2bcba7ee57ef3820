// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption data structures.
//!
//! A caption is one positioned, styled line of text painted over the
//! background. Positions are top-left anchors in canvas pixel space.

pub type CaptionId = u64;

pub const MIN_FONT_SIZE: f64 = 20.0;
pub const MAX_FONT_SIZE: f64 = 100.0;
pub const DEFAULT_FONT_SIZE: f64 = 40.0;
pub const DEFAULT_TEXT: &str = "New Text";
pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// Line height used for footprints and hit areas, relative to the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// A text caption placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub id: CaptionId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub color: String,
    /// Last known overlay footprint in canvas pixels. Informational only.
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Caption {
    /// Create a caption with default text and styling at the given position.
    pub fn new(id: CaptionId, x: f64, y: f64) -> Self {
        Self {
            id,
            text: DEFAULT_TEXT.to_string(),
            x,
            y,
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_COLOR.to_string(),
            width: None,
            height: None,
        }
    }

    /// Fill color as RGB components.
    pub fn rgb(&self) -> [u8; 3] {
        parse_hex_color(&self.color).unwrap_or([0xFF, 0xFF, 0xFF])
    }
}

/// A single-field mutation applied through the document.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptionUpdate {
    Text(String),
    Position { x: f64, y: f64 },
    FontSize(f64),
    Color(String),
    Footprint { width: f64, height: f64 },
}

/// Clamp a font size into the supported range. Non-finite input yields the default.
pub fn clamp_font_size(size: f64) -> f64 {
    if size.is_finite() {
        size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    } else {
        DEFAULT_FONT_SIZE
    }
}

/// Return `color` if it is a valid `#RGB` or `#RRGGBB` hex string, white otherwise.
pub fn sanitize_color(color: &str) -> String {
    let trimmed = color.trim();
    if parse_hex_color(trimmed).is_some() {
        trimmed.to_string()
    } else {
        DEFAULT_COLOR.to_string()
    }
}

/// Parse `#RGB` or `#RRGGBB`.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 16 + v;
            }
            Some(rgb)
        }
        6 => {
            let mut rgb = [0u8; 3];
            for (i, slot) in rgb.iter_mut().enumerate() {
                *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// Format RGB components as an uppercase `#RRGGBB` string.
pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}
