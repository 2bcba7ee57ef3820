// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster export of the composite.

use crate::error::{EditorError, EditorResult};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Encode a rendered surface as PNG bytes.
pub fn encode_png(surface: &RgbaImage) -> EditorResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    surface
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| EditorError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Write encoded bytes to disk.
pub fn save_blob(blob: &[u8], path: &Path) -> EditorResult<()> {
    std::fs::write(path, blob).map_err(|e| EditorError::io(path, e))?;
    log::info!("Exported {} bytes to {}", blob.len(), path.display());
    Ok(())
}
