// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identifiers.

/// Identifier for a node in a [`Tree`](crate::Tree) (generational).
///
/// An id stays valid until its node is removed. Slots are reused after removal,
/// but a reused slot gets a new generation, so old ids are reported as stale
/// instead of aliasing the new node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Arena slot of this id. Stable for the lifetime of the node.
    pub const fn slot(self) -> u32 {
        self.0
    }
}
