// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use treemap_geometry::InvertError;

/// Errors reported by the tile pyramid and cache.
#[derive(Debug, thiserror::Error)]
pub enum TileError {
    /// The world-to-screen transform cannot be inverted.
    #[error(transparent)]
    NonInvertible(#[from] InvertError),
    /// Tiles must be at least one pixel wide.
    #[error("tile size must be positive")]
    ZeroTileSize,
    /// A clip rectangle was non-finite or inverted.
    #[error("clip {0:?} is not a finite, normalized rectangle")]
    InvalidClip(Rect),
    /// A worker thread could not be started.
    #[error("failed to spawn tile worker")]
    Spawn(#[source] std::io::Error),
}
