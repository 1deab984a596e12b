// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The accumulated cushion surface.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

/// A separable quadratic height field `z = Σ s2·t² + s1·t` over both axes.
///
/// Each nesting level adds a parabolic ridge over the node's extent. The
/// surface of a node is the sum of the ridges of all its ancestors and itself.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Surface {
    /// Linear coefficients, `[x, y]`.
    pub linear: [f64; 2],
    /// Quadratic coefficients, `[x, y]`.
    pub quadratic: [f64; 2],
}

impl Surface {
    /// Add a ridge of height `h` spanning `rect`.
    ///
    /// An axis with zero extent is left unchanged.
    #[must_use]
    pub fn with_ridge(mut self, rect: Rect, h: f64) -> Self {
        for (axis, (t1, t2)) in [(rect.x0, rect.x1), (rect.y0, rect.y1)]
            .into_iter()
            .enumerate()
        {
            let extent = t2 - t1;
            if extent != 0.0 {
                self.linear[axis] += 4.0 * h * (t2 + t1) / extent;
                self.quadratic[axis] -= 4.0 * h / extent;
            }
        }
        self
    }

    /// Surface normal components `(nx, ny)` at a world-space point.
    ///
    /// The y component is negated so a light with negative y shines from the
    /// top of the screen.
    pub fn normal_at(&self, p: Point) -> (f64, f64) {
        let nx = 2.0 * self.quadratic[0] * p.x + self.linear[0];
        let ny = -(2.0 * self.quadratic[1] * p.y + self.linear[1]);
        (nx, ny)
    }

    /// Cosine between the surface normal at `p` and `light`.
    pub fn cos_to_light(&self, p: Point, light: [f64; 3]) -> f64 {
        let (nx, ny) = self.normal_at(p);
        (nx * light[0] + ny * light[1] + light[2]) / (nx * nx + ny * ny + 1.0).sqrt()
    }
}
