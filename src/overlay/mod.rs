// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive overlay: per-caption screen elements and the gesture state machine.

pub mod controller;
pub mod element;
