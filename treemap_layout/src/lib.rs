// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Layout: squarified space-filling layout for weighted trees.
//!
//! Given a [`Tree`](treemap_tree::Tree) whose internal sizes are up to date and a
//! bounding rectangle, [`Layout::build`] partitions the rectangle among the
//! nodes proportionally to their weights, recursively, using the squarified
//! treemap algorithm (Bruls, Huizing and van Wijk). The result is a [`Layout`]:
//! a tree parallel to the source tree holding one rectangle per node.
//!
//! - Children are sorted by descending size (ties keep insertion order) and
//!   greedily grouped into rows. A row keeps growing while its worst aspect ratio
//!   does not get worse.
//! - The orientation of every row is derived from the remaining rectangle: a
//!   wide remainder gets a column, a tall one gets a row.
//! - Leaf rectangles exactly tile their parent: no gaps, no overlaps. Zero-weight
//!   children get zero-area rectangles instead of NaNs.
//! - Leaves carry a color resolved by a caller-supplied function of the payload;
//!   internal nodes carry the color of their first leaf, which renderers use
//!   when a subtree is too small to subdivide.
//!
//! The single-level algorithm is also available on its own as [`squarify`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use treemap_layout::{Layout, Rgb};
//! use treemap_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, 0.0, Rgb::BLACK).unwrap();
//! let a = tree.insert(Some(root), 3.0, Rgb::new(200, 40, 40)).unwrap();
//! let b = tree.insert(Some(root), 1.0, Rgb::new(40, 40, 200)).unwrap();
//! tree.update_size(root).unwrap();
//!
//! let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 100.0, 50.0), |c| *c).unwrap();
//! assert_eq!(layout.rect_of(a), Some(Rect::new(0.0, 0.0, 75.0, 50.0)));
//! assert_eq!(layout.rect_of(b), Some(Rect::new(75.0, 0.0, 100.0, 50.0)));
//!
//! let hit = layout.hit_test(Point::new(80.0, 10.0)).unwrap();
//! assert_eq!(hit.node, b);
//! assert_eq!(hit.path, vec![root, b]);
//!
//! // Points outside the root rectangle are not an error.
//! assert!(layout.hit_test(Point::new(-1.0, 10.0)).is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod color;
mod error;
mod layout;
mod squarify;
mod types;

pub use color::Rgb;
pub use error::LayoutError;
pub use layout::Layout;
pub use squarify::squarify;
pub use types::{Hit, LayoutFlags, LayoutId, LayoutNode};
