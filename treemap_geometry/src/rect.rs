// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle predicates and measurements.

use kurbo::{Affine, Point, Rect};

/// Aspect ratio of a `width` x `height` box: `max / min` of the two sides.
///
/// Negative sides are treated as zero. Returns `1.0` when both sides are zero and
/// [`f64::MAX`] when only the shorter side is zero.
#[inline]
pub fn aspect_ratio(width: f64, height: f64) -> f64 {
    let w = width.max(0.0);
    let h = height.max(0.0);
    let (short, long) = if w < h { (w, h) } else { (h, w) };
    if long <= 0.0 {
        1.0
    } else if short <= 0.0 {
        f64::MAX
    } else {
        long / short
    }
}

/// Treemap-oriented operations on [`Rect`].
pub trait RectExt {
    /// Whether the interiors of two rectangles overlap.
    ///
    /// Rectangles that only share an edge or a corner do not intersect.
    fn intersects(&self, other: &Rect) -> bool;

    /// Whether `other` lies entirely within `self`. Edges are inclusive.
    fn includes(&self, other: &Rect) -> bool;

    /// Half-open containment: min edges inclusive, max edges exclusive.
    fn contains_half_open(&self, point: Point) -> bool;

    /// See [`aspect_ratio`].
    fn aspect_ratio(&self) -> f64;

    /// Conservative axis-aligned bounding box of this rectangle under `affine`.
    fn transform_bbox(&self, affine: Affine) -> Rect;

    /// Finite coordinates and `x0 <= x1`, `y0 <= y1`.
    fn is_valid(&self) -> bool;
}

impl RectExt for Rect {
    #[inline]
    fn intersects(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    #[inline]
    fn includes(&self, other: &Rect) -> bool {
        self.x0 <= other.x0 && self.y0 <= other.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    #[inline]
    fn contains_half_open(&self, point: Point) -> bool {
        self.x0 <= point.x && point.x < self.x1 && self.y0 <= point.y && point.y < self.y1
    }

    #[inline]
    fn aspect_ratio(&self) -> f64 {
        aspect_ratio(self.width(), self.height())
    }

    fn transform_bbox(&self, affine: Affine) -> Rect {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        let min_x = (a * self.x0).min(a * self.x1) + (c * self.y0).min(c * self.y1);
        let max_x = (a * self.x0).max(a * self.x1) + (c * self.y0).max(c * self.y1);
        let min_y = (b * self.x0).min(b * self.x1) + (d * self.y0).min(d * self.y1);
        let max_y = (b * self.x0).max(b * self.x1) + (d * self.y0).max(d * self.y1);
        Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
    }

    #[inline]
    fn is_valid(&self) -> bool {
        self.is_finite() && self.x0 <= self.x1 && self.y0 <= self.y1
    }
}
