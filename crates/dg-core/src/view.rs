//! Camera view: world anchor + zoom, and the screen ↔ world mapping.
//!
//! The anchor is the world point shown at the screen's top-left corner.
//! A camera node stores the anchor as its world position and the zoom in
//! its kind; [`SceneGraph::view_of`] and [`SceneGraph::apply_view`] move
//! values between the two.

use crate::geometry::{Bounds, Vec2};
use crate::model::{NodeKind, SceneGraph};
use petgraph::graph::NodeIndex;

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.05;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 32.0;

/// A camera's state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub anchor: Vec2,
    pub zoom: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            anchor: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

/// Bring any zoom value back into `[MIN_ZOOM, MAX_ZOOM]`.
/// Non-finite values reset to 1.
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

impl View {
    pub fn new(anchor: Vec2, zoom: f32) -> Self {
        Self {
            anchor,
            zoom: clamp_zoom(zoom),
        }
    }

    // The screen size is unused while the anchor sits at the top-left.

    pub fn screen_to_world(&self, screen: Vec2, _screen_size: Vec2) -> Vec2 {
        screen / self.zoom + self.anchor
    }

    pub fn world_to_screen(&self, world: Vec2, _screen_size: Vec2) -> Vec2 {
        (world - self.anchor) * self.zoom
    }

    /// Multiply the zoom by `factor`, keeping the world point under
    /// `screen` fixed. Non-finite or non-positive factors are ignored.
    pub fn zoom_at(&mut self, screen: Vec2, screen_size: Vec2, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            log::trace!("zoom_at: ignoring factor {factor}");
            return;
        }
        let before = self.screen_to_world(screen, screen_size);
        self.zoom = clamp_zoom(self.zoom * factor);
        let after = self.screen_to_world(screen, screen_size);
        self.anchor += before - after;
    }

    /// Pan by a screen-space pointer delta; dragging right moves the
    /// content right, whatever the zoom.
    pub fn pan_by(&mut self, screen_delta: Vec2) {
        if screen_delta.is_finite() {
            self.anchor -= screen_delta / self.zoom;
        }
    }

    /// World rectangle currently covered by the screen.
    pub fn visible_world(&self, screen_size: Vec2) -> Bounds {
        Bounds::from_origin_size(self.anchor, screen_size / self.zoom)
    }

    /// Anchor that would put `world` at the centre of the screen.
    pub fn anchor_centering(&self, world: Vec2, screen_size: Vec2) -> Vec2 {
        world - screen_size / (2.0 * self.zoom)
    }
}

impl SceneGraph {
    /// Read the view of a camera node. Non-camera nodes yield a view
    /// anchored at their world position with zoom 1.
    pub fn view_of(&self, camera: NodeIndex) -> View {
        let zoom = match self.node(camera).map(|n| &n.kind) {
            Some(NodeKind::Camera { zoom }) => *zoom,
            _ => 1.0,
        };
        View::new(self.world_position(camera), zoom)
    }

    /// Write a view back into a camera node.
    pub fn apply_view(&mut self, camera: NodeIndex, view: View) {
        if let Some(node) = self.node_mut(camera)
            && let NodeKind::Camera { zoom } = &mut node.kind
        {
            *zoom = clamp_zoom(view.zoom);
        }
        self.set_world_position(camera, view.anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::model::SceneNode;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn zoom_at_keeps_cursor_point_fixed() {
        let mut view = View::default();
        let cursor = Vec2::new(100.0, 100.0);
        let before = view.screen_to_world(cursor, SCREEN);

        view.zoom_at(cursor, SCREEN, 2.0);
        assert_eq!(view.zoom, 2.0);
        assert!(view.screen_to_world(cursor, SCREEN).approx_eq(before, 1e-4));
    }

    #[test]
    fn zoom_at_invariant_over_factors() {
        for &factor in &[0.5, 0.9, 1.1, 1.7, 3.0] {
            let mut view = View::new(Vec2::new(-40.0, 25.0), 1.3);
            let cursor = Vec2::new(321.0, 77.0);
            let before = view.screen_to_world(cursor, SCREEN);
            view.zoom_at(cursor, SCREEN, factor);
            let after = view.screen_to_world(cursor, SCREEN);
            assert!(after.approx_eq(before, 1e-3), "factor {factor}: {before:?} vs {after:?}");
        }
    }

    #[test]
    fn zoom_never_reaches_zero_or_inverts() {
        let mut view = View::default();
        view.zoom_at(Vec2::ZERO, SCREEN, 0.0);
        view.zoom_at(Vec2::ZERO, SCREEN, -2.0);
        view.zoom_at(Vec2::ZERO, SCREEN, f32::NAN);
        assert_eq!(view.zoom, 1.0);

        for _ in 0..200 {
            view.zoom_at(Vec2::ZERO, SCREEN, 0.5);
        }
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn screen_world_roundtrip() {
        let view = View::new(Vec2::new(10.0, -20.0), 2.5);
        let w = Vec2::new(33.0, 44.0);
        let s = view.world_to_screen(w, SCREEN);
        assert!(view.screen_to_world(s, SCREEN).approx_eq(w, 1e-4));
    }

    #[test]
    fn pan_is_zoom_independent_on_screen() {
        let mut view = View::new(Vec2::ZERO, 4.0);
        let w = Vec2::new(5.0, 5.0);
        let before = view.world_to_screen(w, SCREEN);
        view.pan_by(Vec2::new(40.0, 0.0));
        let after = view.world_to_screen(w, SCREEN);
        assert!((after - before).approx_eq(Vec2::new(40.0, 0.0), 1e-4));
    }

    #[test]
    fn camera_node_roundtrip() {
        let mut sg = SceneGraph::new();
        let cam = sg.add_node(
            sg.root,
            SceneNode::new(NodeId::intern("cam"), NodeKind::Camera { zoom: 1.0 }),
        );
        sg.set_position(sg.root, Vec2::new(5.0, 5.0));

        sg.apply_view(cam, View::new(Vec2::new(100.0, 50.0), 3.0));
        let view = sg.view_of(cam);
        assert!(view.anchor.approx_eq(Vec2::new(100.0, 50.0), 1e-4));
        assert_eq!(view.zoom, 3.0);
        assert!(sg.graph[cam].position().approx_eq(Vec2::new(95.0, 45.0), 1e-4));
    }
}
