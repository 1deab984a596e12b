// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout tree: identifiers, flags, nodes, and hits.

use alloc::vec::Vec;
use kurbo::Rect;
use smallvec::SmallVec;
use treemap_tree::NodeId;

use crate::Rgb;

/// Index of a node within a [`Layout`](crate::Layout).
///
/// Layout ids are dense and assigned in build order; the root is always
/// [`LayoutId::ROOT`]. Parents always have smaller ids than their children.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub(crate) u32);

impl LayoutId {
    /// The root of every layout.
    pub const ROOT: Self = Self(0);

    /// Position of this node in [`Layout::iter`](crate::Layout::iter) order.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node facts derived while building the layout.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct LayoutFlags: u8 {
        /// The source node has no children.
        const LEAF  = 0b0000_0001;
        /// The assigned rectangle has zero area.
        const EMPTY = 0b0000_0010;
    }
}

/// One node of a [`Layout`](crate::Layout).
#[derive(Clone, Debug)]
pub struct LayoutNode {
    /// Node of the source tree this entry describes.
    pub source: NodeId,
    /// Assigned world-space rectangle.
    pub rect: Rect,
    /// Weight of the source node at build time.
    pub size: f64,
    /// Resolved color: the node's own for leaves, the first leaf's otherwise.
    pub color: Rgb,
    /// Distance from the layout root.
    pub depth: u32,
    /// Derived flags.
    pub flags: LayoutFlags,
    pub(crate) parent: Option<LayoutId>,
    pub(crate) children: SmallVec<[LayoutId; 4]>,
}

impl LayoutNode {
    /// Whether the source node has no children.
    pub fn is_leaf(&self) -> bool {
        self.flags.contains(LayoutFlags::LEAF)
    }

    /// Parent entry, `None` for the root.
    pub fn parent(&self) -> Option<LayoutId> {
        self.parent
    }

    /// Children in source insertion order.
    pub fn children(&self) -> &[LayoutId] {
        &self.children
    }
}

/// Result of a hit test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    /// The deepest source node containing the point.
    pub node: NodeId,
    /// Layout entry of `node`.
    pub layout: LayoutId,
    /// Path from the layout root to `node` (inclusive).
    pub path: Vec<NodeId>,
}
