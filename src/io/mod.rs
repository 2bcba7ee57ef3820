// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: background loading, raster export and snapshot files.

pub mod background;
pub mod export;
pub mod serialization;
