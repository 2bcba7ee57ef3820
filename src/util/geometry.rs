// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric primitives and coordinate transformations.
//!
//! Two coordinate spaces exist in the editor: canvas space (pixels of the
//! composited raster) and overlay space (on-screen pixels of the interactive
//! controls, relative to the top-left of the overlay container). The
//! [`CoordinateTransformer`] is the only place where the scale factors between
//! them are computed.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Fit `natural` dimensions inside `max` while preserving the aspect ratio.
///
/// Width is constrained first, then height. Images smaller than the box are
/// never upscaled. Results are truncated to whole pixels and never zero.
pub fn fit_within(natural: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (mut width, mut height) = (natural.0 as f64, natural.1 as f64);
    let (max_width, max_height) = (max.0 as f64, max.1 as f64);

    if width > max_width {
        height = height * max_width / width;
        width = max_width;
    }
    if height > max_height {
        width = width * max_height / height;
        height = max_height;
    }

    ((width as u32).max(1), (height as u32).max(1))
}

/// Converts points and sizes between canvas space and overlay space.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateTransformer {
    canvas: (u32, u32),
    overlay: Size,
    scale_x: f64,
    scale_y: f64,
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self {
            canvas: (0, 0),
            overlay: Size::default(),
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl CoordinateTransformer {
    pub fn new(canvas: (u32, u32), overlay: Size) -> Self {
        let mut transformer = Self {
            canvas,
            overlay,
            scale_x: 1.0,
            scale_y: 1.0,
        };
        transformer.recompute();
        transformer
    }

    /// Canvas pixel dimensions changed (background load or reset).
    /// Returns true if the scale factors changed.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> bool {
        self.canvas = (width, height);
        self.recompute()
    }

    /// On-screen layout of the overlay container changed.
    /// Returns true if the scale factors changed.
    pub fn set_overlay_size(&mut self, size: Size) -> bool {
        self.overlay = size;
        self.recompute()
    }

    fn recompute(&mut self) -> bool {
        let (canvas_w, canvas_h) = self.canvas;
        let (scale_x, scale_y) = if canvas_w == 0
            || canvas_h == 0
            || self.overlay.width <= 0.0
            || self.overlay.height <= 0.0
        {
            (1.0, 1.0)
        } else {
            (
                self.overlay.width / canvas_w as f64,
                self.overlay.height / canvas_h as f64,
            )
        };

        let changed = scale_x != self.scale_x || scale_y != self.scale_y;
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        changed
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    /// Size of the overlay container. Falls back to the canvas size while
    /// no layout has been reported yet.
    pub fn overlay_size(&self) -> Size {
        if self.overlay.width > 0.0 && self.overlay.height > 0.0 {
            self.overlay
        } else {
            Size::new(self.canvas.0 as f64, self.canvas.1 as f64)
        }
    }

    pub fn to_overlay(&self, point: Point) -> Point {
        Point::new(point.x * self.scale_x, point.y * self.scale_y)
    }

    pub fn to_canvas(&self, point: Point) -> Point {
        Point::new(point.x / self.scale_x, point.y / self.scale_y)
    }

    pub fn size_to_overlay(&self, size: Size) -> Size {
        Size::new(size.width * self.scale_x, size.height * self.scale_y)
    }

    pub fn size_to_canvas(&self, size: Size) -> Size {
        Size::new(size.width / self.scale_x, size.height / self.scale_y)
    }

    pub fn rect_to_overlay(&self, rect: Rect) -> Rect {
        Rect::from_origin_size(
            self.to_overlay(rect.origin()),
            self.size_to_overlay(rect.size()),
        )
    }

    pub fn rect_to_canvas(&self, rect: Rect) -> Rect {
        Rect::from_origin_size(
            self.to_canvas(rect.origin()),
            self.size_to_canvas(rect.size()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_bound() {
        assert_eq!(fit_within((1000, 500), (800, 600)), (800, 400));
    }

    #[test]
    fn test_fit_height_bound() {
        assert_eq!(fit_within((600, 1200), (800, 600)), (300, 600));
    }

    #[test]
    fn test_fit_both_constraints() {
        // Width pass gives 800x700, height pass then shrinks to fit 600.
        assert_eq!(fit_within((1600, 1400), (800, 600)), (685, 600));
    }

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(fit_within((320, 240), (800, 600)), (320, 240));
    }

    #[test]
    fn test_roundtrip_through_overlay() {
        let transformer = CoordinateTransformer::new((800, 400), Size::new(400.0, 100.0));
        assert_eq!(transformer.scale_x(), 0.5);
        assert_eq!(transformer.scale_y(), 0.25);

        let canvas = Point::new(120.0, 80.0);
        let overlay = transformer.to_overlay(canvas);
        assert_eq!(overlay, Point::new(60.0, 20.0));

        let back = transformer.to_canvas(overlay);
        assert!((back.x - canvas.x).abs() < 1e-9);
        assert!((back.y - canvas.y).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dimensions_fall_back_to_unit_scale() {
        let mut transformer = CoordinateTransformer::new((0, 0), Size::new(400.0, 300.0));
        assert_eq!((transformer.scale_x(), transformer.scale_y()), (1.0, 1.0));

        transformer.set_canvas_size(800, 600);
        transformer.set_overlay_size(Size::new(0.0, 0.0));
        assert_eq!((transformer.scale_x(), transformer.scale_y()), (1.0, 1.0));
        assert_eq!(transformer.overlay_size(), Size::new(800.0, 600.0));
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(30.0, 15.0)));
        assert!(!rect.contains(Point::new(30.1, 15.0)));
        assert!(rect.expand(1.0).contains(Point::new(30.5, 15.5)));
    }
}
