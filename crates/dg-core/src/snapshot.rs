//! Self-contained copies of subtrees, used by copy/paste and duplicate.
//!
//! A snapshot holds values only (no `NodeIndex`), so it stays valid after
//! the original is edited or deleted. The binary form is MessagePack via
//! `rmp-serde`.

use crate::geometry::Vec2;
use crate::id::NodeId;
use crate::model::{NodeKind, SceneGraph, SceneNode, Style};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub kind: NodeKind,
    pub style: Style,
    pub position: Vec2,
    pub size: Vec2,
    pub visible: bool,
    pub locked: bool,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Copy `idx` and its subtree. `None` for the root or a stale index.
    pub fn capture(graph: &SceneGraph, idx: NodeIndex) -> Option<Self> {
        if idx == graph.root {
            return None;
        }
        let node = graph.node(idx)?;
        let children = graph
            .children(idx)
            .iter()
            .filter_map(|&child| Self::capture(graph, child))
            .collect();
        Some(Self {
            id: node.id,
            kind: node.kind.clone(),
            style: node.style.clone(),
            position: node.position(),
            size: node.size(),
            visible: node.visible,
            locked: node.locked,
            children,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, String> {
        rmp_serde::to_vec_named(self).map_err(|e| format!("Snapshot encode error: {e}"))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        rmp_serde::from_slice(bytes).map_err(|e| format!("Snapshot decode error: {e}"))
    }

    /// Number of nodes in the snapshot, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Rebuild the subtree under `parent`, shifted by `offset`.
    ///
    /// Every restored node gets a fresh id, so a snapshot can be restored
    /// any number of times into the graph it came from. Returns the new
    /// subtree root, or `None` if `parent` is stale.
    pub fn restore(&self, graph: &mut SceneGraph, parent: NodeIndex, offset: Vec2) -> Option<NodeIndex> {
        if !graph.contains(parent) {
            return None;
        }
        let idx = self.restore_node(graph, parent, offset);
        (graph.parent(idx) == Some(parent)).then_some(idx)
    }

    fn restore_node(&self, graph: &mut SceneGraph, parent: NodeIndex, offset: Vec2) -> NodeIndex {
        let id = NodeId::fresh(self.kind.tag(), |c| graph.index_of(c).is_some());
        let pos = self.position + offset;
        let mut node = SceneNode::new(id, self.kind.clone())
            .at(pos.x, pos.y)
            .sized(self.size.x, self.size.y);
        node.style = self.style.clone();
        node.visible = self.visible;
        node.locked = self.locked;

        let idx = graph.add_node(parent, node);
        for child in &self.children {
            child.restore_node(graph, idx, Vec2::ZERO);
        }
        idx
    }
}
