// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Tree: an arena-backed weighted hierarchy.
//!
//! This is the input model for the treemap layout engine. Every node owns an
//! ordered list of children, a `size` weight and an arbitrary payload `T`.
//!
//! - Nodes live in a single arena and are addressed by generational [`NodeId`]s,
//!   so parent/child links are plain indices rather than reference-counted
//!   pointers. Removing a node makes its id (and the ids of its subtree) stale.
//! - Child order is insertion order. [`Tree::set_parent`] detaches a node from
//!   its old parent and appends it to the new one, keeping both sides of the link
//!   consistent.
//! - Sizes are validated when they enter the tree: negative and non-finite sizes
//!   are rejected with a [`TreeError`], so layout and rendering never see NaNs.
//! - Internal node sizes are not maintained implicitly. Call
//!   [`Tree::update_size`] to sum leaf sizes bottom-up, or
//!   [`Tree::update_size_with`] to derive leaf sizes from payloads first.
//!
//! ## Example
//!
//! ```rust
//! use treemap_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, 0.0, "root").unwrap();
//! let a = tree.insert(Some(root), 3.0, "a").unwrap();
//! let _b = tree.insert(Some(root), 1.0, "b").unwrap();
//!
//! assert_eq!(tree.update_size(root).unwrap(), 4.0);
//! assert_eq!(tree.size(root), Some(4.0));
//! assert_eq!(tree.parent_of(a), Some(root));
//!
//! // Negative weights are a caller bug and are reported, not propagated.
//! assert!(tree.insert(Some(root), -1.0, "bad").is_err());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod tree;
mod types;

pub use error::TreeError;
pub use tree::{Descendants, Tree};
pub use types::NodeId;
