// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, sizes, traversal.

use alloc::{vec, vec::Vec};

use crate::error::{TreeError, check_size};
use crate::types::NodeId;

/// Weighted tree stored in an arena.
///
/// Nodes are created with [`Tree::insert`] and addressed by [`NodeId`]. A node
/// may be a root (no parent); a tree can hold several roots, although layout
/// always starts from one of them.
///
/// ## Example
///
/// ```rust
/// use treemap_tree::Tree;
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, 0.0, ()).unwrap();
/// let dir = tree.insert(Some(root), 0.0, ()).unwrap();
/// let file = tree.insert(Some(dir), 5.0, ()).unwrap();
/// tree.insert(Some(root), 2.0, ()).unwrap();
///
/// tree.update_size(root).unwrap();
/// assert_eq!(tree.size(dir), Some(5.0));
/// assert_eq!(tree.size(root), Some(7.0));
/// assert_eq!(tree.first_leaf(root), Some(file));
/// ```
pub struct Tree<T> {
    /// slots
    nodes: Vec<Option<Node<T>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    live: usize,
}

impl<T> core::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.live)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node<T> {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    size: f64,
    data: T,
}

impl<T> Tree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Create an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert a node as the last child of `parent` (or as a root if `None`).
    ///
    /// `size` must be finite and non-negative. For internal nodes the value is a
    /// placeholder until [`Tree::update_size`] runs.
    pub fn insert(&mut self, parent: Option<NodeId>, size: f64, data: T) -> Result<NodeId, TreeError> {
        let size = check_size(size)?;
        if let Some(p) = parent
            && !self.is_alive(p)
        {
            return Err(TreeError::StaleNode(p));
        }
        let node = Node {
            generation: 0,
            parent: None,
            children: Vec::new(),
            size,
            data,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node { generation, ..node });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node { generation, ..node }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        self.live += 1;
        if let Some(p) = parent {
            self.link_parent(id, p);
        }
        Ok(id)
    }

    /// Remove a node and its whole subtree. Stale ids are ignored.
    ///
    /// Returns the number of nodes removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if !self.is_alive(id) {
            return 0;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        let doomed: Vec<NodeId> = self.descendants(id).collect();
        for d in &doomed {
            self.nodes[d.idx()] = None;
            self.free_list.push(d.idx());
        }
        self.live -= doomed.len();
        doomed.len()
    }

    /// Move `id` under `new_parent` (appended as its last child), or make it a
    /// root when `new_parent` is `None`.
    ///
    /// Moving a node under one of its own descendants is rejected.
    pub fn set_parent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), TreeError> {
        if !self.is_alive(id) {
            return Err(TreeError::StaleNode(id));
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) {
                return Err(TreeError::StaleNode(p));
            }
            let mut cursor = Some(p);
            while let Some(c) = cursor {
                if c == id {
                    return Err(TreeError::Cycle {
                        node: id,
                        parent: p,
                    });
                }
                cursor = self.parent_of(c);
            }
        }
        if let Some(old) = self.parent_of(id) {
            self.unlink_parent(id, old);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        Ok(())
    }

    /// Set the layout weight of a node.
    pub fn set_size(&mut self, id: NodeId, size: f64) -> Result<(), TreeError> {
        let size = check_size(size)?;
        let node = self.node_mut(id).ok_or(TreeError::StaleNode(id))?;
        node.size = size;
        Ok(())
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Layout weight of a live node.
    pub fn size(&self, id: NodeId) -> Option<f64> {
        self.node(id).map(|n| n.size)
    }

    /// Payload of a live node.
    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|n| &n.data)
    }

    /// Mutable payload of a live node.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|n| &mut n.data)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Get the children of a node in insertion order, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether a live node has no children. Stale ids return `false`.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.children.is_empty())
    }

    /// Number of edges between `id` and its root.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.node(id)?;
        let mut depth = 0;
        let mut cursor = self.parent_of(id);
        while let Some(p) = cursor {
            depth += 1;
            cursor = self.parent_of(p);
        }
        Some(depth)
    }

    /// Iterate the live root nodes in slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
            Some(n) if n.parent.is_none() => {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId uses 32-bit indices by design."
                )]
                Some(NodeId::new(i as u32, n.generation))
            }
            _ => None,
        })
    }

    /// First leaf reached by following first children from `id`.
    ///
    /// A leaf is its own first leaf.
    pub fn first_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut node = self.node(id)?;
        let mut current = id;
        while let Some(&first) = node.children.first() {
            current = first;
            node = self.node(first)?;
        }
        Some(current)
    }

    /// Get the next node in depth-first (pre-order) traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    /// Traversal continues past the subtree of `current` into its following
    /// siblings and ancestors' siblings; use [`Tree::descendants`] to stay
    /// within a subtree.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        let children = self.children_of(current);
        if let Some(&first_child) = children.first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Pre-order iterator over `root` and all of its descendants.
    ///
    /// Children are visited in insertion order. A stale `root` yields nothing.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_, T> {
        let stack = if self.is_alive(root) {
            vec![root]
        } else {
            Vec::new()
        };
        Descendants { tree: self, stack }
    }

    /// Pre-order iterator over the leaves of the subtree rooted at `root`.
    pub fn leaves(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(root).filter(|&id| self.is_leaf(id))
    }

    /// Recompute internal node sizes in the subtree of `root` as the sum of
    /// their children's sizes, bottom-up. Leaf sizes are left as they are.
    ///
    /// Returns the resulting size of `root`.
    pub fn update_size(&mut self, root: NodeId) -> Result<f64, TreeError> {
        self.update_size_inner(root, |_| None)
    }

    /// Like [`Tree::update_size`], but first assigns every leaf in the subtree
    /// the size returned by `size_fn` for its payload.
    ///
    /// Returned sizes are validated like [`Tree::insert`]; the first invalid one
    /// aborts the update with an error.
    pub fn update_size_with<F>(&mut self, root: NodeId, mut size_fn: F) -> Result<f64, TreeError>
    where
        F: FnMut(&T) -> f64,
    {
        self.update_size_inner(root, |data| Some(size_fn(data)))
    }

    fn update_size_inner<F>(&mut self, root: NodeId, mut leaf_size: F) -> Result<f64, TreeError>
    where
        F: FnMut(&T) -> Option<f64>,
    {
        if !self.is_alive(root) {
            return Err(TreeError::StaleNode(root));
        }
        let order: Vec<NodeId> = self.descendants(root).collect();
        // Reverse pre-order visits every child before its parent.
        for &id in order.iter().rev() {
            let total = {
                let node = self.node(id).ok_or(TreeError::StaleNode(id))?;
                if node.children.is_empty() {
                    match leaf_size(&node.data) {
                        Some(size) => check_size(size)?,
                        None => continue,
                    }
                } else {
                    let sum = node
                        .children
                        .iter()
                        .map(|&c| self.size(c).unwrap_or(0.0))
                        .sum::<f64>();
                    check_size(sum)?
                }
            };
            if let Some(node) = self.node_mut(id) {
                node.size = total;
            }
        }
        let total = self.size(root).ok_or(TreeError::StaleNode(root))?;
        log::debug!("updated sizes of {} nodes, root size {total}", order.len());
        Ok(total)
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }
}

/// Pre-order iterator returned by [`Tree::descendants`].
pub struct Descendants<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeId>,
}

impl<T> core::fmt::Debug for Descendants<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Descendants")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<T> Iterator for Descendants<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        // Push in reverse so children come out in insertion order.
        self.stack.extend(tree.children_of(id).iter().rev().copied());
        Some(id)
    }
}
