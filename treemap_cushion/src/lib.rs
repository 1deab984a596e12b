// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Cushion: shaded software rendering of treemap layouts.
//!
//! Flat treemaps make nesting hard to see. Cushion treemaps (van Wijk and van
//! de Wetering, 1999) add a parabolic ridge over every node's rectangle, with
//! ridges shrinking by a falloff factor at each level, and shade the summed
//! surface with one directional light. Siblings then read as separate bumps and
//! the nesting shows up in the shading.
//!
//! - [`CushionRenderer`] walks a [`Layout`](treemap_layout::Layout) top-down,
//!   threading the accumulated [`Surface`] and ridge height, and rasterizes
//!   leaves into a [`PixelBuffer`].
//! - Subtrees whose screen area is at or below
//!   [`CushionParams::min_cushion_size`] are drawn as a single cushion in the
//!   color of their first leaf.
//! - Subtrees outside the clip rectangle are skipped entirely.
//!
//! Pixels are shaded at their centers, mapped back to world space through the
//! inverse transform, so any invertible affine view works.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Affine, Rect};
//! use treemap_cushion::{CushionRenderer, PixelBuffer};
//! use treemap_layout::{Layout, Rgb};
//! use treemap_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, 0.0, Rgb::BLACK).unwrap();
//! tree.insert(Some(root), 3.0, Rgb::new(220, 80, 60)).unwrap();
//! tree.insert(Some(root), 1.0, Rgb::new(60, 120, 220)).unwrap();
//! tree.update_size(root).unwrap();
//! let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 1.0, 0.5), |c| *c).unwrap();
//!
//! // Map the unit-wide world onto a 200x100 buffer.
//! let mut buffer = PixelBuffer::new(200, 100);
//! let stats = CushionRenderer::default()
//!     .render(&layout, Affine::scale(200.0), &mut buffer)
//!     .unwrap();
//! assert_eq!(stats.leaves, 2);
//! assert_eq!(stats.pixels, 200 * 100);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod buffer;
mod error;
mod params;
mod render;
mod surface;

pub use buffer::PixelBuffer;
pub use error::RenderError;
pub use params::CushionParams;
pub use render::{CushionRenderer, RenderStats};
pub use surface::Surface;
