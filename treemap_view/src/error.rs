// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use treemap_geometry::InvertError;

/// Errors reported by [`PanZoom`](crate::PanZoom).
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ViewError {
    /// The transform cannot be inverted.
    #[error(transparent)]
    NonInvertible(#[from] InvertError),
    /// A rectangle was non-finite, inverted, or had zero area.
    #[error("rectangle {0:?} must be finite with positive area")]
    InvalidRect(Rect),
}
