// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster compositing, text measurement and hit-testing.

pub mod engine;
pub mod font;
pub mod hit_test;
