// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Producers of tile bitmaps.

use std::sync::Arc;

use kurbo::Affine;
use treemap_cushion::{CushionRenderer, PixelBuffer, RenderError};
use treemap_layout::{Layout, Rgb};

use crate::TileKey;

/// Renders the bitmap for one tile.
///
/// Implementations are called from worker threads and must be shareable.
pub trait TileSource: Send + Sync {
    /// Render `key` into a new `tile_px` x `tile_px` buffer.
    fn render_tile(&self, key: TileKey, tile_px: u32) -> Result<PixelBuffer, RenderError>;
}

/// A [`TileSource`] that cushion-renders a shared [`Layout`].
#[derive(Clone, Debug)]
pub struct CushionTileSource {
    layout: Arc<Layout>,
    renderer: CushionRenderer,
    background: Rgb,
}

impl CushionTileSource {
    /// Render `layout` with `renderer`, filling uncovered pixels with `background`.
    pub fn new(layout: Arc<Layout>, renderer: CushionRenderer, background: Rgb) -> Self {
        Self {
            layout,
            renderer,
            background,
        }
    }

    /// The layout being rendered.
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }
}

impl TileSource for CushionTileSource {
    fn render_tile(&self, key: TileKey, tile_px: u32) -> Result<PixelBuffer, RenderError> {
        let rect = key.world_rect();
        let world_to_tile =
            Affine::scale(f64::from(tile_px) / rect.width()) * Affine::translate(-rect.origin().to_vec2());
        let mut buffer = PixelBuffer::new(tile_px, tile_px);
        buffer.fill(self.background);
        self.renderer.render(&self.layout, world_to_tile, &mut buffer)?;
        Ok(buffer)
    }
}
