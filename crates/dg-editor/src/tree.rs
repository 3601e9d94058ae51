//! Tree panel model: one row per node, plus drag-and-drop of rows.
//!
//! Dropping a row onto a sibling reorders (before or after, by which half
//! of the target row the pointer is in). Dropping onto a non-sibling
//! container reparents, keeping the dragged node where it is on screen.

use dg_core::NodeIndex;
use dg_core::model::{NodeKind, SceneGraph};

/// One visible line of the tree panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub node: NodeIndex,
    /// 0 for children of the root.
    pub depth: usize,
    /// Top edge of the row in panel pixels.
    pub y: f32,
    pub icon: &'static str,
    pub label: String,
}

/// Result of dropping one row onto another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeDrop {
    Reordered,
    Reparented,
    Rejected,
}

/// Cameras are scene plumbing, not drawing content: they get no row and
/// cannot be moved through the panel.
fn is_camera(graph: &SceneGraph, idx: NodeIndex) -> bool {
    matches!(graph.graph[idx].kind, NodeKind::Camera { .. })
}

/// Rows for the root tree in depth-first paint order, root and cameras
/// excluded.
pub fn tree_rows(graph: &SceneGraph, row_height: f32) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(NodeIndex, usize)> = graph
        .children(graph.root)
        .iter()
        .rev()
        .map(|&c| (c, 0))
        .collect();

    while let Some((idx, depth)) = stack.pop() {
        if is_camera(graph, idx) {
            continue;
        }
        let node = &graph.graph[idx];
        rows.push(TreeRow {
            node: idx,
            depth,
            y: rows.len() as f32 * row_height,
            icon: node.kind.info().icon,
            label: node.id.as_str().to_string(),
        });
        stack.extend(graph.children(idx).iter().rev().map(|&c| (c, depth + 1)));
    }
    rows
}

/// Apply a row drop of `dragged` onto `target`.
///
/// `pointer_y` is in the same panel coordinates as [`TreeRow::y`].
pub fn drop_row(
    graph: &mut SceneGraph,
    dragged: NodeIndex,
    target: &TreeRow,
    pointer_y: f32,
    row_height: f32,
) -> TreeDrop {
    let target_idx = target.node;
    if !graph.contains(dragged) || !graph.contains(target_idx) {
        return TreeDrop::Rejected;
    }
    if is_camera(graph, dragged) || is_camera(graph, target_idx) {
        log::debug!("tree drop: cameras stay where they are");
        return TreeDrop::Rejected;
    }
    if dragged == target_idx || graph.is_ancestor(dragged, target_idx) {
        log::debug!("tree drop: {} onto itself or a descendant", graph.graph[dragged].id);
        return TreeDrop::Rejected;
    }

    if let Some(parent) = graph.parent(dragged)
        && graph.parent(target_idx) == Some(parent)
    {
        let siblings: Vec<NodeIndex> = graph
            .children(parent)
            .iter()
            .copied()
            .filter(|&c| c != dragged)
            .collect();
        let Some(pos) = siblings.iter().position(|&c| c == target_idx) else {
            return TreeDrop::Rejected;
        };
        let after = pointer_y >= target.y + row_height / 2.0;
        let index = if after { pos + 1 } else { pos };
        return if graph.insert_child(parent, dragged, index) {
            TreeDrop::Reordered
        } else {
            TreeDrop::Rejected
        };
    }

    if !graph.graph[target_idx].kind.is_container() {
        return TreeDrop::Rejected;
    }

    let old_local = graph.graph[dragged].position();
    let world = graph.world_position(dragged);
    let target_world = graph.world_position(target_idx);
    graph.set_position(dragged, world - target_world);
    if graph.add_child(target_idx, dragged) {
        log::debug!(
            "tree drop: {} moved under {}",
            graph.graph[dragged].id,
            graph.graph[target_idx].id
        );
        TreeDrop::Reparented
    } else {
        graph.set_position(dragged, old_local);
        TreeDrop::Rejected
    }
}
