// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Tiles: a tile pyramid and background cache for interactive treemaps.
//!
//! Re-rendering a large cushion treemap on every pan or zoom is too slow, so
//! the world plane is split into square tiles arranged in a power-of-two
//! pyramid and each tile is rendered once into a fixed-size bitmap.
//!
//! - [`TileKey`] addresses a tile; level `l` tiles are `2^l` world units wide.
//!   [`level_for_scale`] picks the level for a zoom and [`cover`] lists the
//!   tiles a screen rectangle needs.
//! - [`TileSource`] produces bitmaps; [`CushionTileSource`] renders a shared
//!   [`Layout`](treemap_layout::Layout) with the cushion renderer.
//! - [`TileCache`] keeps a bounded LRU set of bitmaps behind one mutex, renders
//!   misses on a worker pool, and reports completions as [`TileEvent`]s.
//!   Invalidation bumps a generation so late results are discarded.
//! - [`Compositor`] paints a view from the cache, standing in coarser cached
//!   ancestors or a placeholder color for tiles that are not ready yet.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kurbo::{Affine, Rect};
//! use treemap_cushion::{CushionRenderer, PixelBuffer};
//! use treemap_layout::{Layout, Rgb};
//! use treemap_tiles::{Compositor, CushionTileSource, TileCache, TileCacheConfig};
//! use treemap_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, 0.0, Rgb::BLACK).unwrap();
//! tree.insert(Some(root), 2.0, Rgb::new(200, 90, 40)).unwrap();
//! tree.insert(Some(root), 1.0, Rgb::new(40, 90, 200)).unwrap();
//! tree.update_size(root).unwrap();
//! let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 128.0, 64.0), |c| *c).unwrap();
//!
//! let source = CushionTileSource::new(Arc::new(layout), CushionRenderer::default(), Rgb::BLACK);
//! let config = TileCacheConfig { tile_px: 32, capacity: 64, workers: 0 };
//! let cache = TileCache::new(config, Arc::new(source)).unwrap();
//!
//! let mut screen = PixelBuffer::new(128, 64);
//! let stats = Compositor::default()
//!     .composite(&cache, Affine::IDENTITY, Rect::new(0.0, 0.0, 128.0, 64.0), &mut screen)
//!     .unwrap();
//! // Without workers every tile is rendered on the spot.
//! assert!(stats.is_complete());
//! assert_eq!(stats.exact, 8);
//! ```

mod cache;
mod compositor;
mod error;
mod key;
mod source;

pub use cache::{TileCache, TileCacheConfig, TileEvent, TileStatus};
pub use compositor::{CompositeStats, Compositor};
pub use error::TileError;
pub use key::{TileCover, TileKey, cover, level_for_scale};
pub use source::{CushionTileSource, TileSource};
