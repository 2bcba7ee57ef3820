// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background image loading.
//!
//! Reading, fetching and decoding happen off the UI thread. The worker sends
//! exactly one result back; the editor applies it on the UI thread, so a
//! failed load never touches the document.

use crate::error::{EditorError, EditorResult};
use crate::models::background::{Background, BackgroundRef};
use crate::util::geometry::fit_within;
use image::imageops::FilterType;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Where a background came from; selects the bounding box used for fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundKind {
    Upload,
    Template,
}

/// How the decoded image is sized onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitTarget {
    /// Aspect-preserving fit inside a bounding box, never upscaling.
    Within((u32, u32)),
    /// Exactly this canvas size, as recorded by a snapshot.
    Exact((u32, u32)),
}

impl FitTarget {
    fn dimensions(self, natural: (u32, u32)) -> (u32, u32) {
        match self {
            FitTarget::Within(max_box) => fit_within(natural, max_box),
            FitTarget::Exact((width, height)) => (width.max(1), height.max(1)),
        }
    }
}

/// Raw bytes behind a reference.
pub fn read_source(reference: &BackgroundRef) -> EditorResult<Vec<u8>> {
    match reference {
        BackgroundRef::Data { bytes, .. } => Ok(bytes.clone()),
        BackgroundRef::Path(path) => std::fs::read(path).map_err(|e| EditorError::io(path, e)),
        BackgroundRef::Url(url) => fetch(url),
    }
}

fn fetch(url: &str) -> EditorResult<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| EditorError::fetch(url, e))?;

    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| EditorError::fetch(url, e))?;
    let bytes = response.bytes().map_err(|e| EditorError::fetch(url, e))?;

    log::debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

/// Decode `reference` and size it onto the canvas.
pub fn decode_background(reference: BackgroundRef, target: FitTarget) -> EditorResult<Background> {
    let bytes = read_source(&reference)?;
    let decoded = image::load_from_memory(&bytes)?.to_rgba8();
    let natural_size = decoded.dimensions();
    let (width, height) = target.dimensions(natural_size);

    let image = if (width, height) == natural_size {
        decoded
    } else {
        image::imageops::resize(&decoded, width, height, FilterType::Triangle)
    };

    log::info!(
        "Decoded {} ({}x{} -> {}x{})",
        reference.label(),
        natural_size.0,
        natural_size.1,
        width,
        height
    );

    Ok(Background {
        reference,
        image,
        natural_size,
    })
}

/// Decode on a background thread. The receiver yields exactly one result.
pub fn spawn_decode(reference: BackgroundRef, target: FitTarget) -> Receiver<EditorResult<Background>> {
    let (sender, receiver) = channel();

    std::thread::spawn(move || {
        let result = decode_background(reference, target);
        if let Err(ref e) = result {
            log::error!("Failed to load background: {}", e);
        }
        let _ = sender.send(result);
    });

    receiver
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// PNG bytes of a solid image.
    pub(crate) fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba(rgba));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_fits_into_box() {
        let reference = BackgroundRef::from_bytes(png_bytes(1000, 500, [9, 9, 9, 255]));
        let background = decode_background(reference, FitTarget::Within((800, 600))).unwrap();
        assert_eq!(background.size(), (800, 400));
        assert_eq!(background.natural_size, (1000, 500));
    }

    #[test]
    fn test_exact_target_matches_snapshot_size() {
        let reference = BackgroundRef::from_bytes(png_bytes(1600, 1400, [9, 9, 9, 255]));
        let background = decode_background(reference, FitTarget::Exact((685, 600))).unwrap();
        assert_eq!(background.size(), (685, 600));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let reference = BackgroundRef::from_bytes(b"definitely not an image".to_vec());
        assert!(matches!(
            decode_background(reference, FitTarget::Within((800, 600))),
            Err(EditorError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_io() {
        let reference = BackgroundRef::parse("/nonexistent/template.png");
        assert!(matches!(
            decode_background(reference, FitTarget::Within((800, 600))),
            Err(EditorError::Io { .. })
        ));
    }

    #[test]
    fn test_spawned_decode_delivers_once() {
        let reference = BackgroundRef::from_bytes(png_bytes(40, 30, [255, 0, 0, 255]));
        let receiver = spawn_decode(reference, FitTarget::Within((800, 600)));
        let background = receiver.recv().unwrap().unwrap();
        assert_eq!(background.size(), (40, 30));
        assert!(receiver.recv().is_err());
    }
}
