// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout tree: construction and queries.

use alloc::{vec, vec::Vec};
use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect};
use smallvec::SmallVec;
use treemap_geometry::{RectExt, try_inverse};
use treemap_tree::{NodeId, Tree};

use crate::squarify::Squarifier;
use crate::types::{Hit, LayoutFlags, LayoutId, LayoutNode};
use crate::{LayoutError, Rgb};

/// A squarified layout of one subtree of a [`Tree`].
///
/// Nodes are stored densely with parents before children, so a reverse scan
/// visits every child before its parent. The layout is a snapshot: it does not
/// track later edits to the source tree.
#[derive(Clone, Debug)]
pub struct Layout {
    nodes: Vec<LayoutNode>,
    index: HashMap<NodeId, LayoutId>,
}

impl Layout {
    /// Lay out the subtree rooted at `root` inside `bounds`.
    ///
    /// Internal sizes are read as stored; call
    /// [`Tree::update_size`](treemap_tree::Tree::update_size) first if they may be
    /// out of date. `color_fn` is called once per leaf.
    pub fn build<T, F>(
        tree: &Tree<T>,
        root: NodeId,
        bounds: Rect,
        mut color_fn: F,
    ) -> Result<Self, LayoutError>
    where
        F: FnMut(&T) -> Rgb,
    {
        if !tree.is_alive(root) {
            return Err(LayoutError::StaleRoot(root));
        }
        if !bounds.is_valid() {
            return Err(LayoutError::InvalidBounds(bounds));
        }

        let mut layout = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        let mut squarifier = Squarifier::default();
        let mut sizes: Vec<f64> = Vec::new();
        let mut rects: Vec<Rect> = Vec::new();

        layout.push(tree, root, bounds, None, 0, &mut color_fn);
        let mut stack = vec![LayoutId::ROOT];
        while let Some(id) = stack.pop() {
            let (source, rect, depth) = {
                let n = &layout.nodes[id.index()];
                (n.source, n.rect, n.depth)
            };
            let children = tree.children_of(source);
            if children.is_empty() {
                continue;
            }

            sizes.clear();
            sizes.extend(children.iter().map(|&c| tree.size(c).unwrap_or(0.0)));
            rects.clear();
            rects.resize(children.len(), Rect::ZERO);
            squarifier.run(&sizes, rect, &mut rects);

            let mut ids: SmallVec<[LayoutId; 4]> = SmallVec::with_capacity(children.len());
            for (&child, &child_rect) in children.iter().zip(&rects) {
                ids.push(layout.push(tree, child, child_rect, Some(id), depth + 1, &mut color_fn));
            }
            // Reverse so the first child is expanded first.
            stack.extend(ids.iter().rev().copied());
            layout.nodes[id.index()].children = ids;
        }

        // Children sit after their parents, so one reverse pass resolves every
        // internal color from its already-resolved first child.
        for i in (0..layout.nodes.len()).rev() {
            if let Some(&first) = layout.nodes[i].children.first() {
                layout.nodes[i].color = layout.nodes[first.index()].color;
            }
        }

        log::debug!(
            "built layout of {} nodes ({} leaves) in {:?}",
            layout.nodes.len(),
            layout.nodes.iter().filter(|n| n.is_leaf()).count(),
            bounds
        );
        Ok(layout)
    }

    fn push<T, F>(
        &mut self,
        tree: &Tree<T>,
        source: NodeId,
        rect: Rect,
        parent: Option<LayoutId>,
        depth: u32,
        color_fn: &mut F,
    ) -> LayoutId
    where
        F: FnMut(&T) -> Rgb,
    {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "layouts are limited by the u32 node ids of the source tree"
        )]
        let id = LayoutId(self.nodes.len() as u32);
        let mut flags = LayoutFlags::empty();
        let color = if tree.is_leaf(source) {
            flags |= LayoutFlags::LEAF;
            tree.data(source).map_or(Rgb::BLACK, &mut *color_fn)
        } else {
            Rgb::BLACK
        };
        if rect.area() <= 0.0 {
            flags |= LayoutFlags::EMPTY;
        }
        self.nodes.push(LayoutNode {
            source,
            rect,
            size: tree.size(source).unwrap_or(0.0),
            color,
            depth,
            flags,
            parent,
            children: SmallVec::new(),
        });
        self.index.insert(source, id);
        id
    }

    /// Id of the root entry.
    pub fn root(&self) -> LayoutId {
        LayoutId::ROOT
    }

    /// The rectangle the layout was built in.
    pub fn bounds(&self) -> Rect {
        self.nodes[0].rect
    }

    /// Number of nodes, internal and leaf.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a layout contains at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by layout id.
    pub fn node(&self, id: LayoutId) -> Option<&LayoutNode> {
        self.nodes.get(id.index())
    }

    /// Children of `id` in source order; empty for leaves and unknown ids.
    pub fn children(&self, id: LayoutId) -> &[LayoutId] {
        self.node(id).map(LayoutNode::children).unwrap_or_default()
    }

    /// Parent of `id`.
    pub fn parent(&self, id: LayoutId) -> Option<LayoutId> {
        self.node(id).and_then(LayoutNode::parent)
    }

    /// Layout entry for a source node.
    pub fn layout_id_of(&self, node: NodeId) -> Option<LayoutId> {
        self.index.get(&node).copied()
    }

    /// Rectangle assigned to a source node.
    pub fn rect_of(&self, node: NodeId) -> Option<Rect> {
        self.layout_id_of(node).map(|id| self.nodes[id.index()].rect)
    }

    /// All nodes, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = (LayoutId, &LayoutNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ids were assigned from u32 in `push`"
            )]
            let id = LayoutId(i as u32);
            (id, n)
        })
    }

    /// Leaf nodes, in the same order as [`Layout::iter`].
    pub fn leaves(&self) -> impl Iterator<Item = (LayoutId, &LayoutNode)> + '_ {
        self.iter().filter(|(_, n)| n.is_leaf())
    }

    /// Deepest node containing `point` (world space), with its path from the root.
    ///
    /// Containment is half-open, so a point on a shared edge belongs to the
    /// node on its right or below. Zero-area nodes are never hit.
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        let root = &self.nodes[0];
        if !root.rect.contains_half_open(point) {
            return None;
        }
        let mut current = LayoutId::ROOT;
        let mut path = vec![root.source];
        'descend: loop {
            for &child in &self.nodes[current.index()].children {
                if self.nodes[child.index()].rect.contains_half_open(point) {
                    current = child;
                    path.push(self.nodes[child.index()].source);
                    continue 'descend;
                }
            }
            break;
        }
        Some(Hit {
            node: self.nodes[current.index()].source,
            layout: current,
            path,
        })
    }

    /// [`Layout::hit_test`] for a screen-space point under `world_to_screen`.
    pub fn hit_test_screen(
        &self,
        point: Point,
        world_to_screen: Affine,
    ) -> Result<Option<Hit>, LayoutError> {
        let screen_to_world = try_inverse(world_to_screen)?;
        Ok(self.hit_test(screen_to_world * point))
    }

    /// Nodes whose rectangles overlap `query` with positive area.
    ///
    /// Subtrees whose root does not overlap are skipped. Results are in
    /// pre-order, parents before their children.
    pub fn intersect_rect(&self, query: Rect) -> Vec<LayoutId> {
        let mut out = Vec::new();
        let mut stack = vec![LayoutId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if !node.rect.intersects(&query) {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level() -> (Tree<Rgb>, NodeId, [NodeId; 5]) {
        // root
        // ├── g (internal): x=4, y=2
        // └── z=2, w=1, v=1
        let mut tree = Tree::new();
        let root = tree.insert(None, 0.0, Rgb::BLACK).unwrap();
        let g = tree.insert(Some(root), 0.0, Rgb::BLACK).unwrap();
        let x = tree.insert(Some(g), 4.0, Rgb::new(1, 0, 0)).unwrap();
        let _y = tree.insert(Some(g), 2.0, Rgb::new(2, 0, 0)).unwrap();
        let z = tree.insert(Some(root), 2.0, Rgb::new(3, 0, 0)).unwrap();
        let w = tree.insert(Some(root), 1.0, Rgb::new(4, 0, 0)).unwrap();
        let v = tree.insert(Some(root), 1.0, Rgb::new(5, 0, 0)).unwrap();
        tree.update_size(root).unwrap();
        (tree, root, [g, x, z, w, v])
    }

    #[test]
    fn leaves_tile_bounds_without_overlap() {
        let (tree, root, _) = two_level();
        let bounds = Rect::new(0.0, 0.0, 90.0, 90.0);
        let layout = Layout::build(&tree, root, bounds, |c| *c).unwrap();

        let leaves: Vec<Rect> = layout.leaves().map(|(_, n)| n.rect).collect();
        assert_eq!(leaves.len(), 5);
        let area: f64 = leaves.iter().map(|r| r.area()).sum();
        assert!((area - 8100.0).abs() < 1e-6);
        for (i, a) in leaves.iter().enumerate() {
            assert!(bounds.includes(a));
            for b in &leaves[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn areas_are_proportional_to_sizes() {
        let (tree, root, _) = two_level();
        let bounds = Rect::new(0.0, 0.0, 90.0, 90.0);
        let layout = Layout::build(&tree, root, bounds, |c| *c).unwrap();
        let total = tree.size(root).unwrap();
        for (_, n) in layout.iter() {
            let expected = bounds.area() * n.size / total;
            assert!((n.rect.area() - expected).abs() < 1e-6, "{n:?}");
        }
    }

    #[test]
    fn children_nest_inside_parents() {
        let (tree, root, _) = two_level();
        let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 64.0, 48.0), |c| *c).unwrap();
        for (id, n) in layout.iter() {
            if let Some(p) = n.parent() {
                assert!(p < id);
                assert!(layout.node(p).unwrap().rect.includes(&n.rect));
                assert_eq!(n.depth, layout.node(p).unwrap().depth + 1);
            }
            for &c in n.children() {
                assert_eq!(layout.parent(c), Some(id));
            }
        }
    }

    #[test]
    fn internal_color_comes_from_first_leaf() {
        let (tree, root, [g, ..]) = two_level();
        let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 90.0, 90.0), |c| *c).unwrap();
        let g_node = layout.node(layout.layout_id_of(g).unwrap()).unwrap();
        assert!(!g_node.is_leaf());
        assert_eq!(g_node.color, Rgb::new(1, 0, 0));
        assert_eq!(layout.node(layout.root()).unwrap().color, Rgb::new(1, 0, 0));
    }

    #[test]
    fn hit_test_returns_deepest_node_and_path() {
        let (tree, root, [g, x, ..]) = two_level();
        let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 90.0, 90.0), |c| *c).unwrap();
        let center = layout.rect_of(x).unwrap().center();
        let hit = layout.hit_test(center).unwrap();
        assert_eq!(hit.node, x);
        assert_eq!(hit.path, vec![root, g, x]);
        assert_eq!(hit.layout, layout.layout_id_of(x).unwrap());

        assert!(layout.hit_test(Point::new(90.0, 10.0)).is_none());
        assert!(layout.hit_test(Point::new(10.0, -0.5)).is_none());
    }

    #[test]
    fn hit_test_screen_inverts_the_view() {
        let (tree, root, [_, x, ..]) = two_level();
        let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 90.0, 90.0), |c| *c).unwrap();
        let view = Affine::translate((10.0, 20.0)) * Affine::scale(2.0);
        let screen = view * layout.rect_of(x).unwrap().center();
        let hit = layout.hit_test_screen(screen, view).unwrap().unwrap();
        assert_eq!(hit.node, x);

        let err = layout.hit_test_screen(screen, Affine::scale(0.0));
        assert!(matches!(err, Err(LayoutError::NonInvertible(_))));
    }

    #[test]
    fn intersect_rect_prunes_subtrees() {
        let (tree, root, [g, x, ..]) = two_level();
        let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 90.0, 90.0), |c| *c).unwrap();
        let x_rect = layout.rect_of(x).unwrap();
        let probe = Rect::from_center_size(x_rect.center(), (1.0, 1.0));
        let hits = layout.intersect_rect(probe);
        let sources: Vec<NodeId> = hits.iter().map(|&id| layout.node(id).unwrap().source).collect();
        assert_eq!(sources, vec![root, g, x]);

        assert!(layout.intersect_rect(Rect::new(100.0, 100.0, 110.0, 110.0)).is_empty());
    }

    #[test]
    fn zero_weights_do_not_poison_the_layout() {
        let mut tree = Tree::new();
        let root = tree.insert(None, 0.0, Rgb::BLACK).unwrap();
        let a = tree.insert(Some(root), 0.0, Rgb::WHITE).unwrap();
        let b = tree.insert(Some(root), 0.0, Rgb::WHITE).unwrap();
        tree.update_size(root).unwrap();
        let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), |c| *c).unwrap();
        for id in [a, b] {
            let r = layout.rect_of(id).unwrap();
            assert!(r.is_valid());
            assert_eq!(r.area(), 0.0);
            let n = layout.node(layout.layout_id_of(id).unwrap()).unwrap();
            assert!(n.flags.contains(LayoutFlags::EMPTY | LayoutFlags::LEAF));
        }
        assert!(layout.hit_test(Point::new(5.0, 5.0)).is_some_and(|h| h.node == root));
    }

    #[test]
    fn rejects_bad_inputs() {
        let (mut tree, root, [g, ..]) = two_level();
        let bad = Rect::new(10.0, 0.0, 0.0, 10.0);
        assert_eq!(
            Layout::build(&tree, root, bad, |c| *c).unwrap_err(),
            LayoutError::InvalidBounds(bad)
        );
        tree.remove(g);
        assert_eq!(
            Layout::build(&tree, g, Rect::new(0.0, 0.0, 1.0, 1.0), |c| *c).unwrap_err(),
            LayoutError::StaleRoot(g)
        );
    }

    #[test]
    fn subtree_layouts_ignore_siblings() {
        let (tree, _, [g, x, ..]) = two_level();
        let layout = Layout::build(&tree, g, Rect::new(0.0, 0.0, 30.0, 10.0), |c| *c).unwrap();
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.rect_of(x), Some(Rect::new(0.0, 0.0, 20.0, 10.0)));
        assert_eq!(layout.bounds(), Rect::new(0.0, 0.0, 30.0, 10.0));
    }
}
