// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: captions, backgrounds, the document and its snapshot form.

pub mod background;
pub mod caption;
pub mod document;
pub mod snapshot;
