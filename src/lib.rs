// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption Studio
//!
//! Compose an image from a background picture and any number of movable,
//! resizable text captions, then export the result as PNG or save the
//! editable state for later.

#![forbid(unsafe_code)]

pub mod config;
pub mod editor;
pub mod error;
pub mod io;
pub mod models;
pub mod overlay;
pub mod render;
pub mod util;

pub use config::EditorConfig;
pub use editor::{CanvasOutcome, Editor, LoadEvent, LoadStateRequest};
pub use error::{EditorError, EditorResult};
pub use io::background::BackgroundKind;
pub use models::background::BackgroundRef;
pub use models::caption::{Caption, CaptionId, CaptionUpdate};
pub use models::snapshot::{CaptionSnapshot, Snapshot};
