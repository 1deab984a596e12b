// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping rectangles onto a pixel grid.

use core::ops::Range;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Rect;

/// Columns and rows of a `width` x `height` grid whose pixel centers lie in `rect`.
///
/// Pixel `(x, y)` has its center at `(x + 0.5, y + 0.5)`. Containment is
/// half-open, matching [`RectExt::contains_half_open`](crate::RectExt::contains_half_open),
/// so two rectangles sharing an edge never claim the same pixel. Non-finite
/// or inverted rectangles yield empty ranges.
///
/// ```rust
/// use kurbo::Rect;
/// use treemap_geometry::pixel_centers;
///
/// let (xs, ys) = pixel_centers(Rect::new(0.4, 0.6, 3.0, 2.0), 10, 10);
/// assert_eq!(xs, 0..3);
/// assert_eq!(ys, 1..2);
/// ```
pub fn pixel_centers(rect: Rect, width: u32, height: u32) -> (Range<u32>, Range<u32>) {
    (
        span(rect.x0, rect.x1, width),
        span(rect.y0, rect.y1, height),
    )
}

fn span(t0: f64, t1: f64, limit: u32) -> Range<u32> {
    let index = |t: f64| {
        if t.is_nan() {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Clamped to [0, limit] before the cast."
        )]
        let i = (t - 0.5).ceil().clamp(0.0, f64::from(limit)) as u32;
        i
    };
    let (start, end) = (index(t0), index(t1));
    start..end.max(start)
}
