// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::NodeId;

/// Errors reported when building or restructuring a [`Tree`](crate::Tree).
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// A size was below zero.
    #[error("node size must be non-negative, got {0}")]
    NegativeSize(f64),
    /// A size was NaN or infinite.
    #[error("node size must be finite, got {0}")]
    NonFiniteSize(f64),
    /// The id does not refer to a live node.
    #[error("stale or unknown node {0:?}")]
    StaleNode(NodeId),
    /// The requested parent lies inside the node's own subtree.
    #[error("cannot move {node:?} under its own descendant {parent:?}")]
    Cycle {
        /// Node being moved.
        node: NodeId,
        /// Rejected parent.
        parent: NodeId,
    },
}

/// Validate a layout weight.
pub(crate) fn check_size(size: f64) -> Result<f64, TreeError> {
    if !size.is_finite() {
        Err(TreeError::NonFiniteSize(size))
    } else if size < 0.0 {
        Err(TreeError::NegativeSize(size))
    } else {
        Ok(size)
    }
}
