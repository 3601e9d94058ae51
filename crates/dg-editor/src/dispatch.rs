//! Event dispatch.
//!
//! Events are handled one at a time in arrival order:
//!
//! 1. Events the host UI already captured are skipped.
//! 2. Keys go straight to the shortcut map.
//! 3. Pointer-down tries the minimap overlay, then the hit chain in the
//!    root tree (the node under the pointer, then each ancestor), then
//!    detached top-level nodes, then the background. The first handler
//!    that consumes the event owns the resulting session.
//! 4. Pointer-move and pointer-up go to the session owner; pointer-up
//!    always ends the session.
//! 5. Scroll zooms the camera about the pointer.

use crate::editor::Editor;
use crate::input::{InputEvent, Modifiers, PointerButton, QueuedEvent};
use crate::interaction::{CameraPan, MinimapNav, NodeDrag, Session, scroll_zoom_factor};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use dg_core::NodeIndex;
use dg_core::geometry::Vec2;
use dg_core::model::SceneGraph;
use smallvec::SmallVec;

/// Who consumed an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Node(NodeIndex),
    Background,
    Minimap,
    Shortcut(ShortcutAction),
}

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    /// Flagged as captured by the host UI; the scene was not touched.
    Skipped,
    Consumed(Target),
    /// No handler wanted the event.
    Unhandled,
}

/// The node under `world` within the subtree at `top`, followed by each of
/// its ancestors up to `top`. Empty when nothing is hit.
pub fn hit_chain(graph: &SceneGraph, top: NodeIndex, world: Vec2) -> SmallVec<[NodeIndex; 8]> {
    match graph.find_component_at(top, world) {
        Some(hit) => graph
            .ancestors(hit)
            .into_iter()
            .take_while(|&idx| idx != top)
            .chain(std::iter::once(top))
            .collect(),
        None => SmallVec::new(),
    }
}

impl Editor {
    /// Dispatch a batch of events in order. Each event sees the effects of
    /// the ones before it.
    pub fn process<I>(&mut self, events: I) -> Vec<Dispatch>
    where
        I: IntoIterator,
        I::Item: Into<QueuedEvent>,
    {
        events
            .into_iter()
            .map(|event| self.dispatch(&event.into()))
            .collect()
    }

    pub fn dispatch(&mut self, queued: &QueuedEvent) -> Dispatch {
        if queued.host_captured {
            log::trace!("skipping host-captured {:?}", queued.event);
            return Dispatch::Skipped;
        }

        match &queued.event {
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers),
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.pointer_down(Vec2::new(*x, *y), *button, *modifiers),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Vec2::new(*x, *y)),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Scroll { x, y, delta } => self.scroll(Vec2::new(*x, *y), *delta),
        }
    }

    fn key(&mut self, key: &str, modifiers: Modifiers) -> Dispatch {
        match ShortcutMap::resolve(key, modifiers) {
            Some(action) => {
                self.run_shortcut(action);
                Dispatch::Consumed(Target::Shortcut(action))
            }
            None => Dispatch::Unhandled,
        }
    }

    fn pointer_down(&mut self, screen: Vec2, button: PointerButton, modifiers: Modifiers) -> Dispatch {
        if let Some(stale) = self.session.take() {
            log::debug!("{} ended by a new pointer-down", stale.name());
        }

        // The overlay is drawn over everything, so it is asked first.
        if button == PointerButton::Primary
            && let Some(minimap) = self.minimap()
            && minimap.rect.contains(screen)
        {
            let nav = MinimapNav::begin(minimap.world);
            self.steer_from_minimap(&nav, screen);
            self.session = Some(Session::MinimapNav(nav));
            log::debug!("minimap navigation started");
            return Dispatch::Consumed(Target::Minimap);
        }

        let world = self.screen_to_world(screen);
        let root = self.graph.root;
        for idx in hit_chain(&self.graph, root, world) {
            if self.node_pointer_down(idx, world, button, modifiers) {
                return Dispatch::Consumed(Target::Node(idx));
            }
        }

        // Detached nodes, topmost first.
        for top in self.graph.top_level().into_iter().rev() {
            for idx in hit_chain(&self.graph, top, world) {
                if self.node_pointer_down(idx, world, button, modifiers) {
                    return Dispatch::Consumed(Target::Node(idx));
                }
            }
        }

        if self.background_pointer_down(screen, button) {
            Dispatch::Consumed(Target::Background)
        } else {
            Dispatch::Unhandled
        }
    }

    /// Per-node handler: unlocked draggable nodes take primary presses and
    /// start a drag. Everything else declines so the press moves on to
    /// the parent.
    fn node_pointer_down(
        &mut self,
        idx: NodeIndex,
        world: Vec2,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> bool {
        let node = &self.graph.graph[idx];
        if button != PointerButton::Primary || !node.kind.is_draggable() || node.locked {
            return false;
        }

        if modifiers.shift {
            self.selection.toggle(&mut self.graph, idx);
            if self.graph.graph[idx].is_selected() {
                self.selection.set_active(&mut self.graph, idx);
            }
        } else {
            self.selection.clear_all(&mut self.graph);
            self.selection.set_active(&mut self.graph, idx);
        }

        self.session = Some(Session::NodeDrag(NodeDrag::begin(&self.graph, idx, world)));
        true
    }

    fn background_pointer_down(&mut self, screen: Vec2, button: PointerButton) -> bool {
        if button == self.config.pan_button {
            self.session = Some(Session::CameraPan(CameraPan::begin(screen)));
            log::debug!("camera pan started");
            return true;
        }
        if button == PointerButton::Primary {
            self.selection.clear_all(&mut self.graph);
            return true;
        }
        false
    }

    fn pointer_move(&mut self, screen: Vec2) -> Dispatch {
        let Some(mut session) = self.session.take() else {
            return Dispatch::Unhandled;
        };

        let target = match &mut session {
            Session::NodeDrag(drag) => {
                let world = self.screen_to_world(screen);
                drag.update(&mut self.graph, world, self.config.snap_step());
                Target::Node(drag.node)
            }
            Session::CameraPan(pan) => {
                let mut view = self.view();
                pan.update(&mut view, screen);
                self.set_view(view);
                Target::Background
            }
            Session::MinimapNav(nav) => {
                self.steer_from_minimap(nav, screen);
                Target::Minimap
            }
        };

        self.session = Some(session);
        Dispatch::Consumed(target)
    }

    fn pointer_up(&mut self) -> Dispatch {
        let Some(session) = self.session.take() else {
            return Dispatch::Unhandled;
        };
        log::debug!("{} ended", session.name());
        let target = match session {
            Session::NodeDrag(drag) => Target::Node(drag.node),
            Session::CameraPan(_) => Target::Background,
            Session::MinimapNav(_) => Target::Minimap,
        };
        Dispatch::Consumed(target)
    }

    fn scroll(&mut self, screen: Vec2, delta: f32) -> Dispatch {
        match scroll_zoom_factor(delta, self.config.zoom_step) {
            Some(factor) => {
                self.zoom_about(screen, factor);
                Dispatch::Consumed(Target::Background)
            }
            None => Dispatch::Unhandled,
        }
    }

    fn steer_from_minimap(&mut self, nav: &MinimapNav, screen: Vec2) {
        let mut view = self.view();
        let overlay = self.config.minimap.rect();
        let sensitivity = self.config.minimap.sensitivity;
        if nav.update(&mut view, overlay, screen, self.screen_size, sensitivity) {
            self.set_view(view);
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
    fn hit_chain_walks_to_top() {
        let mut sg = SceneGraph::new();
        let g = sg.add_node(
            sg.root,
            SceneNode::new(NodeId::intern("d_g"), NodeKind::Group).sized(100.0, 100.0),
        );
        let r = sg.add_node(
            g,
            SceneNode::new(NodeId::intern("d_r"), NodeKind::Rect)
                .at(10.0, 10.0)
                .sized(10.0, 10.0),
        );
        let root = sg.root;
        assert_eq!(hit_chain(&sg, root, Vec2::new(15.0, 15.0)).to_vec(), vec![r, g, root]);
        assert_eq!(hit_chain(&sg, root, Vec2::new(50.0, 50.0)).to_vec(), vec![g, root]);
        assert!(hit_chain(&sg, root, Vec2::new(500.0, 500.0)).is_empty());
    }
}
