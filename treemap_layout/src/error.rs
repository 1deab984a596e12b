// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use treemap_geometry::InvertError;
use treemap_tree::NodeId;

/// Errors reported by [`Layout`](crate::Layout).
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The requested root is not a live node of the tree.
    #[error("layout root {0:?} is not a live node")]
    StaleRoot(NodeId),
    /// Bounds were non-finite or had `x1 < x0` / `y1 < y0`.
    #[error("layout bounds {0:?} are not a finite, normalized rectangle")]
    InvalidBounds(Rect),
    /// A screen-space query was given a transform that cannot be inverted.
    #[error(transparent)]
    NonInvertible(#[from] InvertError),
}
