//! Selection state: one active node plus per-node `selected` flags.
//!
//! The active node drives the inspector; the flags drive multi-select
//! operations and selection outlines. Whenever `active` is `Some`, that
//! node is also flagged.

use crate::model::SceneGraph;
use petgraph::graph::NodeIndex;

/// Selection owned by an editing session and passed explicitly to
/// dispatch and inspector code.
#[derive(Debug, Default, Clone)]
pub struct SelectionContext {
    active: Option<NodeIndex>,
}

impl SelectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node currently driving the inspector.
    pub fn active(&self) -> Option<NodeIndex> {
        self.active
    }

    /// Make `idx` the active node and flag it selected. Other flags stay.
    pub fn set_active(&mut self, graph: &mut SceneGraph, idx: NodeIndex) {
        if !graph.contains(idx) {
            return;
        }
        graph.set_selected_flag(idx, true);
        self.active = Some(idx);
    }

    /// Drop the active pointer. Multi-select flags are left alone.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Drop the active pointer and every `selected` flag.
    pub fn clear_all(&mut self, graph: &mut SceneGraph) {
        self.active = None;
        let indices: Vec<NodeIndex> = graph.graph.node_indices().collect();
        for idx in indices {
            graph.set_selected_flag(idx, false);
        }
    }

    /// Flip the `selected` flag of `idx`. Deselecting the active node also
    /// clears the active pointer.
    pub fn toggle(&mut self, graph: &mut SceneGraph, idx: NodeIndex) {
        let Some(node) = graph.node(idx) else {
            return;
        };
        let now_selected = !node.is_selected();
        graph.set_selected_flag(idx, now_selected);
        if !now_selected && self.active == Some(idx) {
            self.active = None;
        }
    }

    /// Flag every node in the root tree except the root itself.
    pub fn select_all(&mut self, graph: &mut SceneGraph) {
        for idx in graph.descendants(graph.root) {
            graph.set_selected_flag(idx, true);
        }
    }

    /// All flagged nodes, in arena order.
    pub fn selected(&self, graph: &SceneGraph) -> Vec<NodeIndex> {
        graph
            .graph
            .node_indices()
            .filter(|&idx| graph.graph[idx].is_selected())
            .collect()
    }

    /// Clear every trace of `idx` and its descendants from the selection.
    /// Must run before the subtree is destroyed.
    pub fn forget_subtree(&mut self, graph: &mut SceneGraph, idx: NodeIndex) {
        if !graph.contains(idx) {
            return;
        }
        let mut doomed = graph.descendants(idx);
        doomed.push(idx);
        for i in doomed {
            graph.set_selected_flag(i, false);
            if self.active == Some(i) {
                self.active = None;
            }
        }
    }

    /// Check the active/flag invariant. Used by tests and debug assertions.
    pub fn is_consistent(&self, graph: &SceneGraph) -> bool {
        match self.active {
            Some(idx) => graph.node(idx).is_some_and(|n| n.is_selected()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::model::{NodeKind, SceneNode};
    use pretty_assertions::assert_eq;

    fn scene() -> (SceneGraph, NodeIndex, NodeIndex) {
        let mut sg = SceneGraph::new();
        let a = sg.add_node(sg.root, SceneNode::new(NodeId::intern("sa"), NodeKind::Rect));
        let b = sg.add_node(sg.root, SceneNode::new(NodeId::intern("sb"), NodeKind::Rect));
        (sg, a, b)
    }

    #[test]
    fn set_active_flags_node() {
        let (mut sg, a, b) = scene();
        let mut sel = SelectionContext::new();
        sel.set_active(&mut sg, a);
        sel.set_active(&mut sg, b);

        assert_eq!(sel.active(), Some(b));
        assert!(sg.graph[b].is_selected());
        // Multi-select keeps the previous flag.
        assert!(sg.graph[a].is_selected());
        assert!(sel.is_consistent(&sg));
    }

    #[test]
    fn toggle_off_active_clears_active() {
        let (mut sg, a, _) = scene();
        let mut sel = SelectionContext::new();
        sel.set_active(&mut sg, a);
        sel.toggle(&mut sg, a);

        assert_eq!(sel.active(), None);
        assert!(!sg.graph[a].is_selected());
        sel.toggle(&mut sg, a);
        assert!(sg.graph[a].is_selected());
        assert_eq!(sel.active(), None);
    }

    #[test]
    fn clear_keeps_flags_clear_all_drops_them() {
        let (mut sg, a, b) = scene();
        let mut sel = SelectionContext::new();
        sel.set_active(&mut sg, a);
        sel.toggle(&mut sg, b);

        sel.clear();
        assert_eq!(sel.active(), None);
        assert_eq!(sel.selected(&sg), vec![a, b]);

        sel.clear_all(&mut sg);
        assert!(sel.selected(&sg).is_empty());
    }

    #[test]
    fn deleting_active_node_clears_it_first() {
        let (mut sg, a, _) = scene();
        let child = sg.add_node(a, SceneNode::new(NodeId::intern("sc"), NodeKind::Text {
            content: "x".into(),
            font_size: 12.0,
        }));
        let mut sel = SelectionContext::new();
        sel.set_active(&mut sg, child);

        sel.forget_subtree(&mut sg, a);
        assert_eq!(sel.active(), None);
        assert!(!sg.graph[child].is_selected());
        sg.delete_subtree(a);
        assert!(sel.is_consistent(&sg));
    }
}
