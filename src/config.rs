// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Every field has a default, so a partial (or missing) configuration file
//! is always usable.

use crate::overlay::controller::DEFAULT_MIN_ELEMENT_SIZE;
use crate::render::hit_test::DEFAULT_HIT_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "CAPTION_STUDIO_CONFIG";
/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "caption_studio.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: u32,
    pub height: u32,
}

impl BoxSize {
    pub fn as_tuple(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Bounding box for images the user uploads.
    #[serde(default = "default_box")]
    pub upload_box: BoxSize,
    /// Bounding box for catalog templates.
    #[serde(default = "default_box")]
    pub template_box: BoxSize,
    /// Canvas size before any background is loaded.
    #[serde(default = "default_box")]
    pub placeholder_size: BoxSize,
    /// Template catalog: opaque references (paths or URLs).
    #[serde(default = "default_templates")]
    pub templates: Vec<String>,
    /// Candidate display fonts, tried in order.
    #[serde(default = "default_font_paths")]
    pub font_paths: Vec<PathBuf>,
    #[serde(default = "default_hit_tolerance")]
    pub hit_tolerance: f64,
    /// Clicking bare canvas adds a caption there.
    #[serde(default = "default_true")]
    pub click_to_add: bool,
    /// Smallest overlay element edge in screen pixels.
    #[serde(default = "default_min_overlay_size")]
    pub min_overlay_size: f64,
}

// Default value functions
fn default_box() -> BoxSize {
    BoxSize {
        width: 800,
        height: 600,
    }
}

fn default_templates() -> Vec<String> {
    [
        "assets/DSCI0952.JPG",
        "assets/DSCI0953.JPG",
        "assets/DSCI0954.JPG",
        "assets/DSCI0955.JPG",
        "assets/DSCI0956.JPG",
        "assets/DSCI0957.JPG",
        "assets/DSCI0958.JPG",
        "assets/DSCI0959.JPG",
        "assets/n1286238688_30243831_2079.jpg",
        "assets/plakat1.jpg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_font_paths() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/msttcorefonts/Impact.ttf",
        "/usr/share/fonts/truetype/msttcorefonts/impact.ttf",
        "/usr/share/fonts/TTF/impact.ttf",
        "/System/Library/Fonts/Supplemental/Impact.ttf",
        "/Library/Fonts/Impact.ttf",
        "C:\\Windows\\Fonts\\impact.ttf",
        "/usr/share/fonts/truetype/msttcorefonts/Arial_Black.ttf",
        "C:\\Windows\\Fonts\\ariblk.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

fn default_hit_tolerance() -> f64 {
    DEFAULT_HIT_TOLERANCE
}

fn default_true() -> bool {
    true
}

fn default_min_overlay_size() -> f64 {
    DEFAULT_MIN_ELEMENT_SIZE
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            upload_box: default_box(),
            template_box: default_box(),
            placeholder_size: default_box(),
            templates: default_templates(),
            font_paths: default_font_paths(),
            hit_tolerance: default_hit_tolerance(),
            click_to_add: true,
            min_overlay_size: default_min_overlay_size(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Load from `$CAPTION_STUDIO_CONFIG`, then `./caption_studio.json`,
    /// falling back to defaults. Problems are logged, never fatal.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(CONFIG_FILE);
                local.exists().then_some(local)
            });

        let Some(path) = path else {
            log::debug!("No configuration file, using defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
