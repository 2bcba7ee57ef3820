// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background image references.
//!
//! A reference is the persisted form of "which picture is behind the
//! captions": a remote URL, a local path, or the raw bytes of an uploaded
//! file carried inline as a `data:` URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::RgbaImage;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundRef {
    Url(String),
    Path(PathBuf),
    Data { mime: String, bytes: Vec<u8> },
}

impl BackgroundRef {
    /// Interpret an opaque reference string (snapshot field or catalog entry).
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        if let Some(rest) = reference.strip_prefix("data:") {
            if let Some((header, payload)) = rest.split_once(',') {
                let mime = header.trim_end_matches(";base64").to_string();
                let bytes = STANDARD.decode(payload.trim()).unwrap_or_default();
                return Self::Data { mime, bytes };
            }
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Url(reference.to_string())
        } else {
            Self::Path(PathBuf::from(reference))
        }
    }

    /// Wrap raw uploaded bytes, sniffing the MIME type from the content.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime = image::guess_format(&bytes)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());
        Self::Data { mime, bytes }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    /// Short human-readable label for logs and the UI.
    pub fn label(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Path(path) => path.display().to_string(),
            Self::Data { mime, bytes } => format!("{} upload ({} bytes)", mime, bytes.len()),
        }
    }
}

impl fmt::Display for BackgroundRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Data { mime, bytes } => {
                write!(f, "data:{};base64,{}", mime, STANDARD.encode(bytes))
            }
        }
    }
}

/// A decoded background, already fitted to the canvas dimensions.
#[derive(Debug, Clone)]
pub struct Background {
    pub reference: BackgroundRef,
    pub image: RgbaImage,
    /// Size of the source image before fitting.
    pub natural_size: (u32, u32),
}

impl Background {
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
