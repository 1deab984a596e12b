// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use treemap_geometry::InvertError;

/// Errors reported while rendering.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The world-to-buffer transform cannot be inverted.
    #[error(transparent)]
    NonInvertible(#[from] InvertError),
    /// A target rectangle was non-finite, inverted, or too large to allocate.
    #[error("render target {0:?} is not a finite, normalized, allocatable rectangle")]
    InvalidTarget(Rect),
    /// A buffer of these dimensions does not fit in memory.
    #[error("a {width}x{height} pixel buffer is too large to allocate")]
    TooLarge {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// Raw pixel data did not match the declared dimensions.
    #[error("expected {expected} bytes of RGB data for {width}x{height}, got {actual}")]
    SizeMismatch {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
        /// Bytes required by the dimensions.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
}
