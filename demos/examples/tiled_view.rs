// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom into a treemap through the background tile cache.
//!
//! Each frame composites whatever tiles are ready, falling back to coarser
//! tiles, then waits for the workers before drawing the next one. The last
//! frame is saved as PPM.
//!
//! Run:
//! - `RUST_LOG=treemap_tiles=trace cargo run -p treemap_demos --example tiled_view`

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use kurbo::{Point, Rect};
use treemap_cushion::{CushionRenderer, PixelBuffer};
use treemap_demos::{synthetic_tree, write_ppm};
use treemap_layout::{Layout, Rgb};
use treemap_tiles::{Compositor, CushionTileSource, TileCache, TileCacheConfig, TileEvent};
use treemap_view::PanZoom;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let (tree, root) = synthetic_tree(42, 6, 10)?;
    let world = Rect::new(0.0, 0.0, 1.0, 1.0);
    let layout = Arc::new(Layout::build(&tree, root, world, |c| *c)?);

    let viewport = Rect::new(0.0, 0.0, 640.0, 480.0);
    let mut view = PanZoom::new(viewport);
    view.fit(world)?;
    view.set_limits(Some(world))?;

    let source = CushionTileSource::new(layout, CushionRenderer::default(), Rgb::BLACK);
    let cache = TileCache::new(
        TileCacheConfig {
            tile_px: 128,
            ..TileCacheConfig::default()
        },
        Arc::new(source),
    )?;
    let compositor = Compositor::default();
    let mut screen = PixelBuffer::new(640, 480);

    let cursor = Point::new(420.0, 180.0);
    for frame in 0..12 {
        if frame > 0 {
            view.zoom(cursor, 2.0);
        }
        // Keep compositing until every tile of this view is exact.
        let complete = loop {
            let stats = compositor.composite(&cache, view.transform(), viewport, &mut screen)?;
            log::info!(
                "frame {frame} (scale {:.0}): {} exact, {} fallback, {} placeholder",
                view.scale(),
                stats.exact,
                stats.fallback,
                stats.placeholder
            );
            if stats.is_complete() {
                break true;
            }
            match cache.wait_event() {
                Some(TileEvent::Ready(_)) => {}
                Some(TileEvent::Failed(key)) => {
                    log::warn!("tile {key:?} failed; keeping the fallback");
                    break false;
                }
                None => break false,
            }
        };
        if !complete {
            log::warn!("frame {frame} drawn with stand-in tiles");
        }
        view.take_invalidation();
    }

    write_ppm(Path::new("tiled_view.ppm"), &screen)?;
    log::info!("wrote tiled_view.ppm");
    Ok(())
}
