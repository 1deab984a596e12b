// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Shading and recursion parameters for [`CushionRenderer`](crate::CushionRenderer).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CushionParams {
    /// Normalized light direction `(x, y, z)`.
    pub light: [f64; 3],
    /// Ambient intensity, added to every shaded pixel.
    pub ambient: f64,
    /// Diffuse intensity, scaled by the cosine to the light.
    pub diffuse: f64,
    /// Ridge height added at the root.
    pub height: f64,
    /// Factor applied to the ridge height at each level.
    pub falloff: f64,
    /// Screen-space area (in square pixels) at or below which a subtree is
    /// drawn as a single cushion in its first leaf's color.
    pub min_cushion_size: f64,
}

impl Default for CushionParams {
    fn default() -> Self {
        Self {
            light: [0.09759, -0.19518, 0.97590],
            ambient: 40.0,
            diffuse: 215.0,
            height: 0.75,
            falloff: 0.75,
            min_cushion_size: 9.0,
        }
    }
}
