// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render a synthetic directory tree as a cushion treemap and save it as PPM.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p treemap_demos --example cushion_ppm -- out.ppm`

use std::error::Error;
use std::path::PathBuf;

use kurbo::{Affine, Point, Rect};
use treemap_cushion::{CushionRenderer, PixelBuffer};
use treemap_demos::{synthetic_tree, write_ppm};
use treemap_layout::{Layout, Rgb};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("treemap.ppm"), PathBuf::from);

    let (tree, root) = synthetic_tree(0x5EED, 5, 12)?;
    log::info!("tree: {} nodes, total size {:.1}", tree.len(), tree.size(root).unwrap_or(0.0));

    let bounds = Rect::new(0.0, 0.0, f64::from(WIDTH), f64::from(HEIGHT));
    let layout = Layout::build(&tree, root, bounds, |c| *c)?;

    let mut buffer = PixelBuffer::new(WIDTH, HEIGHT);
    buffer.fill(Rgb::BLACK);
    let stats = CushionRenderer::default().render(&layout, Affine::IDENTITY, &mut buffer)?;
    log::info!(
        "rendered {} leaves ({} flattened subtrees), {} px",
        stats.leaves,
        stats.flattened,
        stats.pixels
    );

    if let Some(hit) = layout.hit_test(Point::new(f64::from(WIDTH) / 2.0, f64::from(HEIGHT) / 2.0)) {
        log::info!("center pixel is {:?} at depth {}", hit.node, hit.path.len() - 1);
    }

    write_ppm(&path, &buffer)?;
    log::info!("wrote {}", path.display());
    Ok(())
}
