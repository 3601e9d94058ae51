//! Interaction state machines.
//!
//! Each machine is `Idle` until the dispatcher starts a [`Session`] on
//! pointer-down, receives every following pointer-move directly, and is
//! dropped on pointer-up or cancellation. Only one session exists at a
//! time.

use dg_core::NodeIndex;
use dg_core::geometry::{Bounds, Vec2};
use dg_core::minimap::{Minimap, follow};
use dg_core::model::SceneGraph;
use dg_core::view::View;

/// The active interaction, if any, and the state it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    NodeDrag(NodeDrag),
    CameraPan(CameraPan),
    MinimapNav(MinimapNav),
}

impl Session {
    /// The node the session is moving, for cancellation on delete.
    pub fn node(&self) -> Option<NodeIndex> {
        match self {
            Session::NodeDrag(drag) => Some(drag.node),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Session::NodeDrag(_) => "node drag",
            Session::CameraPan(_) => "camera pan",
            Session::MinimapNav(_) => "minimap navigation",
        }
    }
}

// ─── Node drag ───────────────────────────────────────────────────────────

/// Moves one node so the grab point stays under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDrag {
    pub node: NodeIndex,
    /// Pointer minus node world position at pointer-down.
    pub offset: Vec2,
}

impl NodeDrag {
    pub fn begin(graph: &SceneGraph, node: NodeIndex, world_pointer: Vec2) -> Self {
        let offset = world_pointer - graph.world_position(node);
        log::debug!("drag {}: offset {offset:?}", graph.graph[node].id);
        Self { node, offset }
    }

    /// Place the node at `world_pointer - offset`, snapped per axis when
    /// `snap` is set.
    pub fn update(&self, graph: &mut SceneGraph, world_pointer: Vec2, snap: Option<f32>) {
        if !graph.contains(self.node) {
            return;
        }
        let mut target = world_pointer - self.offset;
        if let Some(step) = snap {
            target = target.snap(step);
        }
        graph.set_world_position(self.node, target);
    }
}

// ─── Camera pan ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CameraPan {
    last: Vec2,
}

impl CameraPan {
    pub fn begin(screen: Vec2) -> Self {
        Self { last: screen }
    }

    /// Shift the view by the pointer movement since the last event.
    pub fn update(&mut self, view: &mut View, screen: Vec2) {
        view.pan_by(screen - self.last);
        self.last = screen;
    }
}

// ─── Camera zoom ─────────────────────────────────────────────────────────

/// Zoom factor for one scroll event: `step` forward, `1 / step` backward.
/// `None` for a zero or non-finite delta.
pub fn scroll_zoom_factor(delta: f32, step: f32) -> Option<f32> {
    if !delta.is_finite() || delta == 0.0 {
        return None;
    }
    Some(if delta > 0.0 { step } else { 1.0 / step })
}

// ─── Minimap navigation ──────────────────────────────────────────────────

/// Steers the camera from the minimap overlay.
///
/// The world region is frozen when the session starts so the mapping does
/// not shift under the pointer while the camera moves.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapNav {
    pub world: Bounds,
}

impl MinimapNav {
    pub fn begin(world: Bounds) -> Self {
        Self { world }
    }

    /// Move the view centre toward the world point under `screen`.
    /// Returns false (view untouched) when the target is rejected.
    pub fn update(
        &self,
        view: &mut View,
        overlay: Bounds,
        screen: Vec2,
        screen_size: Vec2,
        sensitivity: f32,
    ) -> bool {
        let minimap = Minimap::new(overlay, self.world);
        let Some(target) = minimap.screen_to_world(screen) else {
            log::debug!("minimap: no target for {screen:?}");
            return false;
        };
        let desired = view.anchor_centering(target, screen_size);
        match follow(view.anchor, desired, sensitivity) {
            Some(anchor) => {
                view.anchor = anchor;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::id::NodeId;
    use dg_core::model::{NodeKind, SceneNode};
    use pretty_assertions::assert_eq;

    #[test]
    fn drag_keeps_grab_offset() {
        let mut sg = SceneGraph::new();
        let a = sg.add_node(
            sg.root,
            SceneNode::new(NodeId::intern("i_a"), NodeKind::Rect).sized(50.0, 50.0),
        );

        let drag = NodeDrag::begin(&sg, a, Vec2::new(5.0, 5.0));
        assert_eq!(drag.offset, Vec2::new(5.0, 5.0));

        drag.update(&mut sg, Vec2::new(30.0, 40.0), None);
        assert_eq!(sg.graph[a].position(), Vec2::new(25.0, 35.0));
    }

    #[test]
    fn drag_inside_moved_parent_sets_local_position() {
        let mut sg = SceneGraph::new();
        let g = sg.add_node(
            sg.root,
            SceneNode::new(NodeId::intern("i_g"), NodeKind::Group).at(100.0, 100.0),
        );
        let a = sg.add_node(
            g,
            SceneNode::new(NodeId::intern("i_child"), NodeKind::Rect).sized(10.0, 10.0),
        );

        let drag = NodeDrag::begin(&sg, a, Vec2::new(102.0, 103.0));
        drag.update(&mut sg, Vec2::new(152.0, 153.0), None);
        assert_eq!(sg.graph[a].position(), Vec2::new(50.0, 50.0));
        assert_eq!(sg.world_position(a), Vec2::new(150.0, 150.0));
    }

    #[test]
    fn drag_snaps_per_axis() {
        let mut sg = SceneGraph::new();
        let a = sg.add_node(
            sg.root,
            SceneNode::new(NodeId::intern("i_snap"), NodeKind::Rect).sized(10.0, 10.0),
        );
        let drag = NodeDrag::begin(&sg, a, Vec2::ZERO);
        drag.update(&mut sg, Vec2::new(14.0, 16.0), Some(10.0));
        assert_eq!(sg.graph[a].position(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn pan_follows_pointer_at_any_zoom() {
        let mut view = View::new(Vec2::ZERO, 2.0);
        let mut pan = CameraPan::begin(Vec2::new(100.0, 100.0));
        pan.update(&mut view, Vec2::new(120.0, 90.0));
        assert_eq!(view.anchor, Vec2::new(-10.0, 5.0));
    }

    #[test]
    fn scroll_factor_direction() {
        assert_eq!(scroll_zoom_factor(1.0, 1.1), Some(1.1));
        assert_eq!(scroll_zoom_factor(-3.0, 2.0), Some(0.5));
        assert_eq!(scroll_zoom_factor(0.0, 1.1), None);
        assert_eq!(scroll_zoom_factor(f32::NAN, 1.1), None);
    }

    #[test]
    fn minimap_nav_damps_toward_target() {
        let mut view = View::default();
        let nav = MinimapNav::begin(Bounds::new(0.0, 0.0, 1000.0, 1000.0));
        let overlay = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let screen = Vec2::new(200.0, 200.0);

        // Centre of the overlay → world (500, 500) → desired anchor (400, 400).
        assert!(nav.update(&mut view, overlay, Vec2::new(50.0, 50.0), screen, 0.5));
        assert_eq!(view.anchor, Vec2::new(200.0, 200.0));
        assert!(nav.update(&mut view, overlay, Vec2::new(50.0, 50.0), screen, 1.0));
        assert_eq!(view.anchor, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn minimap_nav_rejects_degenerate_world() {
        let mut view = View::default();
        let nav = MinimapNav::begin(Bounds::new(0.0, 0.0, 0.0, 100.0));
        let moved = nav.update(
            &mut view,
            Bounds::new(0.0, 0.0, 100.0, 100.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(100.0, 100.0),
            1.0,
        );
        assert!(!moved);
        assert_eq!(view, View::default());
    }
}
