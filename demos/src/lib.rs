// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the demos: a synthetic file-system-like tree and a PPM writer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use treemap_cushion::PixelBuffer;
use treemap_layout::Rgb;
use treemap_tree::{NodeId, Tree, TreeError};

/// Leaf colors, picked by a leaf's "extension".
pub const PALETTE: [Rgb; 6] = [
    Rgb::from_hex(0xe0_5a_47),
    Rgb::from_hex(0xf2_b1_34),
    Rgb::from_hex(0x5c_b8_5c),
    Rgb::from_hex(0x42_8b_ca),
    Rgb::from_hex(0x9b_59_b6),
    Rgb::from_hex(0x95_a5_a6),
];

/// Small xorshift generator so demo output is reproducible.
#[derive(Clone, Debug)]
pub struct Rng(u64);

impl Rng {
    /// Seeded generator; a zero seed is replaced by a fixed constant.
    pub fn new(seed: u64) -> Self {
        Self(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    #[allow(clippy::cast_precision_loss, reason = "53 random bits fit an f64 mantissa")]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    /// Uniform index in `0..n`.
    #[allow(clippy::cast_possible_truncation, reason = "the result is below n")]
    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// Build a random directory tree with `depth` levels below the root.
///
/// Directories get between one and `fanout` children; file sizes follow a
/// rough power law so a few large files dominate, as on real disks. Internal
/// sizes are summed before returning.
pub fn synthetic_tree(
    seed: u64,
    depth: u32,
    fanout: usize,
) -> Result<(Tree<Rgb>, NodeId), TreeError> {
    let mut rng = Rng::new(seed);
    let mut tree = Tree::new();
    let root = tree.insert(None, 0.0, Rgb::BLACK)?;
    let mut frontier = vec![(root, 0)];
    while let Some((dir, level)) = frontier.pop() {
        let children = 1 + rng.below(fanout.max(1));
        for _ in 0..children {
            let is_dir = level + 1 < depth && rng.next_f64() < 0.35;
            if is_dir {
                let sub = tree.insert(Some(dir), 0.0, Rgb::BLACK)?;
                frontier.push((sub, level + 1));
            } else {
                let size = 1.0 / (rng.next_f64() + 0.01).powi(2);
                let color = PALETTE[rng.below(PALETTE.len())];
                tree.insert(Some(dir), size, color)?;
            }
        }
    }
    tree.update_size(root)?;
    Ok((tree, root))
}

/// Write `buffer` as a binary PPM (P6) image.
pub fn write_ppm(path: &Path, buffer: &PixelBuffer) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P6\n{} {}\n255\n", buffer.width(), buffer.height())?;
    out.write_all(buffer.as_bytes())?;
    out.flush()
}
