//! Hit testing: world point → node lookup.
//!
//! Walks children in reverse paint order (front-to-back), so a point
//! resolves to whatever was drawn last.

use crate::geometry::{Bounds, Vec2};
use crate::model::SceneGraph;
use petgraph::graph::NodeIndex;

impl SceneGraph {
    /// True iff the node is visible and `point` lies in its half-open
    /// world box.
    pub fn hit_test(&self, idx: NodeIndex, point: Vec2) -> bool {
        match self.node(idx) {
            Some(node) if node.visible => self.world_bounds(idx).contains(point),
            _ => false,
        }
    }

    /// Topmost node under `point` in the subtree rooted at `idx`.
    ///
    /// Children are tried last-added first; `idx` itself is the fallback.
    /// Hidden nodes hide their whole subtree.
    pub fn find_component_at(&self, idx: NodeIndex, point: Vec2) -> Option<NodeIndex> {
        let node = self.node(idx)?;
        if !node.visible {
            return None;
        }

        for &child in self.children(idx).iter().rev() {
            if let Some(hit) = self.find_component_at(child, point) {
                return Some(hit);
            }
        }

        self.hit_test(idx, point).then_some(idx)
    }

    /// All visible nodes in the root tree whose world box intersects
    /// `rect`, in paint order. The root is never included.
    pub fn nodes_in_rect(&self, rect: Bounds) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        self.collect_intersecting(self.root, &rect, &mut out);
        out
    }

    fn collect_intersecting(&self, idx: NodeIndex, rect: &Bounds, out: &mut Vec<NodeIndex>) {
        let node = &self.graph[idx];
        if !node.visible {
            return;
        }
        if idx != self.root && self.world_bounds(idx).intersects(rect) {
            out.push(idx);
        }
        for &child in self.children(idx) {
            self.collect_intersecting(child, rect, out);
        }
    }
}
