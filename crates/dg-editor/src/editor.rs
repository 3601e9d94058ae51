//! The editing session: scene, camera, selection and the active
//! interaction, plus the operations the host UI calls directly
//! (inspector setters, clipboard, documents, painting).

use crate::config::EditorConfig;
use crate::document::Document;
use crate::interaction::Session;
use crate::shortcuts::ShortcutAction;
use dg_core::NodeIndex;
use dg_core::geometry::{Bounds, Vec2};
use dg_core::id::NodeId;
use dg_core::minimap::Minimap;
use dg_core::model::{DEFAULT_ZOOM, NodeKind, SceneGraph, SceneNode};
use dg_core::registry::KindRegistry;
use dg_core::selection::SelectionContext;
use dg_core::snapshot::NodeSnapshot;
use dg_core::view::View;
use dg_render::{Surface, paint_minimap, paint_scene};
use std::path::Path;

/// Offset applied to pasted and duplicated subtrees.
const PASTE_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

const DEFAULT_SCREEN_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// A message for the user, queued until the host collects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
}

pub struct Editor {
    pub graph: SceneGraph,
    pub selection: SelectionContext,
    pub config: EditorConfig,
    /// Tag lookup used when loading documents.
    pub registry: KindRegistry,
    pub(crate) camera: NodeIndex,
    pub(crate) screen_size: Vec2,
    pub(crate) session: Option<Session>,
    clipboard: Option<Vec<u8>>,
    notices: Vec<Notice>,
}

impl Editor {
    /// Start editing `graph`. A camera node is added under the root if
    /// the scene has none.
    pub fn new(mut graph: SceneGraph, config: EditorConfig) -> Self {
        let camera = ensure_camera(&mut graph);
        Self {
            graph,
            selection: SelectionContext::new(),
            config: config.sanitized(),
            registry: KindRegistry::default(),
            camera,
            screen_size: DEFAULT_SCREEN_SIZE,
            session: None,
            clipboard: None,
            notices: Vec::new(),
        }
    }

    pub fn empty(config: EditorConfig) -> Self {
        Self::new(SceneGraph::new(), config)
    }

    // ─── Camera & screen ─────────────────────────────────────────────────

    pub fn camera(&self) -> NodeIndex {
        self.camera
    }

    pub fn view(&self) -> View {
        self.graph.view_of(self.camera)
    }

    pub fn set_view(&mut self, view: View) {
        self.graph.apply_view(self.camera, view);
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Track the host's canvas size. Non-finite or negative sizes are
    /// ignored.
    pub fn set_screen_size(&mut self, size: Vec2) {
        if size.is_finite() && size.x >= 0.0 && size.y >= 0.0 {
            self.screen_size = size;
        }
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.view().screen_to_world(screen, self.screen_size)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// End the active session without applying anything further.
    pub fn cancel_session(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("{} cancelled", session.name());
        }
    }

    /// World region the minimap currently represents: all visible content
    /// plus whatever the camera shows.
    pub fn tracked_world(&self) -> Bounds {
        let visible = self.view().visible_world(self.screen_size);
        match self.graph.content_bounds() {
            Some(content) => content.union(&visible),
            None => visible,
        }
    }

    /// Minimap mapping, or `None` when the overlay is disabled. While the
    /// minimap is being dragged its world region stays fixed.
    pub fn minimap(&self) -> Option<Minimap> {
        if !self.config.minimap.is_enabled() {
            return None;
        }
        let world = match &self.session {
            Some(Session::MinimapNav(nav)) => nav.world,
            _ => self.tracked_world(),
        };
        Some(Minimap::new(self.config.minimap.rect(), world))
    }

    // ─── Documents & notices ─────────────────────────────────────────────

    /// Load a document, replacing the scene. On failure the current scene
    /// is kept and a warning is queued.
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        match Document::load(path, &self.registry) {
            Ok(doc) => {
                if !doc.skipped_tags.is_empty() {
                    self.warn(format!(
                        "Skipped {} node(s) with unknown tags: {}",
                        doc.skipped_tags.len(),
                        doc.skipped_tags.join(", ")
                    ));
                }
                self.replace_graph(doc.graph);
                true
            }
            Err(e) => {
                self.warn(e);
                false
            }
        }
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> bool {
        match Document::save(&self.graph, path) {
            Ok(()) => true,
            Err(e) => {
                self.warn(e);
                false
            }
        }
    }

    /// Swap in a new scene; selection, session and clipboard-independent
    /// state are reset.
    pub fn replace_graph(&mut self, mut graph: SceneGraph) {
        self.cancel_session();
        self.selection = SelectionContext::new();
        self.camera = ensure_camera(&mut graph);
        self.graph = graph;
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.notices.push(Notice::Warning(message));
    }

    // ─── Inspector ───────────────────────────────────────────────────────

    pub fn active_node(&self) -> Option<&SceneNode> {
        self.selection.active().and_then(|idx| self.graph.node(idx))
    }

    /// Set a node's local position. False for stale indices or
    /// non-finite values.
    pub fn set_node_position(&mut self, idx: NodeIndex, position: Vec2) -> bool {
        if !self.graph.contains(idx) || !position.is_finite() {
            return false;
        }
        self.graph.set_position(idx, position);
        true
    }

    pub fn set_node_size(&mut self, idx: NodeIndex, size: Vec2) -> bool {
        if !self.graph.contains(idx) || !size.is_finite() {
            return false;
        }
        self.graph.set_size(idx, size);
        true
    }

    pub fn set_visible(&mut self, idx: NodeIndex, visible: bool) -> bool {
        match self.graph.node_mut(idx) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_locked(&mut self, idx: NodeIndex, locked: bool) -> bool {
        match self.graph.node_mut(idx) {
            Some(node) => {
                node.locked = locked;
                true
            }
            None => false,
        }
    }

    /// Give a node a new id. Rejects the root, ids already in use and
    /// names the document format cannot write back.
    pub fn rename(&mut self, idx: NodeIndex, name: &str) -> bool {
        if idx == self.graph.root {
            return false;
        }
        match NodeId::parse(name) {
            Some(id) => self.graph.rename(idx, id),
            None => false,
        }
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Delete `idx` and its subtree. Any session moving a node inside the
    /// subtree is cancelled and the selection forgets it first. The root
    /// and the editor camera cannot be deleted.
    pub fn delete_node(&mut self, idx: NodeIndex) -> bool {
        if idx == self.graph.root || !self.graph.contains(idx) {
            return false;
        }
        if idx == self.camera || self.graph.is_ancestor(idx, self.camera) {
            log::debug!("delete: refusing to delete the camera");
            return false;
        }

        if let Some(node) = self.session.as_ref().and_then(Session::node)
            && (node == idx || self.graph.is_ancestor(idx, node))
        {
            self.cancel_session();
        }
        self.selection.forget_subtree(&mut self.graph, idx);
        let removed = self.graph.delete_subtree(idx);
        log::debug!("deleted {} node(s)", removed.len());
        !removed.is_empty()
    }

    /// Delete every selected node whose ancestors are not also selected.
    pub fn delete_selection(&mut self) -> usize {
        let selected = self.selection.selected(&self.graph);
        let tops: Vec<NodeIndex> = selected
            .iter()
            .copied()
            .filter(|&idx| {
                !selected
                    .iter()
                    .any(|&other| other != idx && self.graph.is_ancestor(other, idx))
            })
            .collect();
        tops.into_iter().filter(|&idx| self.delete_node(idx)).count()
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&mut self.graph);
        // The camera is part of the tree but not of the drawing.
        if self.graph.node(self.camera).is_some_and(|n| n.is_selected()) {
            self.selection.toggle(&mut self.graph, self.camera);
        }
    }

    /// Copy the active node's subtree to the clipboard.
    pub fn copy(&mut self) -> bool {
        let Some(snapshot) = self.active_snapshot() else {
            return false;
        };
        match snapshot.to_bytes() {
            Ok(bytes) => {
                self.clipboard = Some(bytes);
                true
            }
            Err(e) => {
                self.warn(e);
                false
            }
        }
    }

    /// Paste the clipboard next to the active node (or into the root) and
    /// select the copy.
    pub fn paste(&mut self) -> Option<NodeIndex> {
        let bytes = self.clipboard.clone()?;
        match NodeSnapshot::from_bytes(&bytes) {
            Ok(snapshot) => self.place_snapshot(&snapshot),
            Err(e) => {
                self.warn(e);
                None
            }
        }
    }

    /// Copy + paste of the active node, leaving the clipboard alone.
    pub fn duplicate(&mut self) -> Option<NodeIndex> {
        let snapshot = self.active_snapshot()?;
        self.place_snapshot(&snapshot)
    }

    fn active_snapshot(&self) -> Option<NodeSnapshot> {
        let idx = self.selection.active()?;
        if idx == self.camera {
            return None;
        }
        NodeSnapshot::capture(&self.graph, idx)
    }

    fn place_snapshot(&mut self, snapshot: &NodeSnapshot) -> Option<NodeIndex> {
        let parent = self
            .selection
            .active()
            .and_then(|idx| self.graph.parent(idx))
            .unwrap_or(self.graph.root);
        let idx = snapshot.restore(&mut self.graph, parent, PASTE_OFFSET)?;
        self.selection.clear_all(&mut self.graph);
        self.selection.set_active(&mut self.graph, idx);
        Some(idx)
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    /// Run a resolved shortcut. Returns true if anything changed.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        log::debug!("shortcut {action:?}");
        let center = self.screen_size / 2.0;
        match action {
            ShortcutAction::Delete => self.delete_selection() > 0,
            ShortcutAction::SelectAll => {
                self.select_all();
                true
            }
            ShortcutAction::Deselect => {
                self.cancel_session();
                self.selection.clear_all(&mut self.graph);
                true
            }
            ShortcutAction::Duplicate => self.duplicate().is_some(),
            ShortcutAction::Copy => self.copy(),
            ShortcutAction::Paste => self.paste().is_some(),
            ShortcutAction::ZoomIn => self.zoom_about(center, self.config.zoom_step),
            ShortcutAction::ZoomOut => self.zoom_about(center, 1.0 / self.config.zoom_step),
            ShortcutAction::ResetView => {
                self.set_view(View::new(Vec2::ZERO, DEFAULT_ZOOM));
                true
            }
            ShortcutAction::SendBackward => self.reorder_active(SceneGraph::send_backward),
            ShortcutAction::BringForward => self.reorder_active(SceneGraph::bring_forward),
            ShortcutAction::SendToBack => self.reorder_active(SceneGraph::send_to_back),
            ShortcutAction::BringToFront => self.reorder_active(SceneGraph::bring_to_front),
            ShortcutAction::ToggleSnap => {
                self.config.snap_to_grid = !self.config.snap_to_grid;
                true
            }
        }
    }

    pub(crate) fn zoom_about(&mut self, screen: Vec2, factor: f32) -> bool {
        let mut view = self.view();
        let before = view;
        view.zoom_at(screen, self.screen_size, factor);
        self.set_view(view);
        view != before
    }

    fn reorder_active(&mut self, op: fn(&mut SceneGraph, NodeIndex) -> bool) -> bool {
        match self.selection.active() {
            Some(idx) => op(&mut self.graph, idx),
            None => false,
        }
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Paint the scene through the camera, then the minimap on top.
    pub fn paint(&self, surface: &mut dyn Surface) {
        let view = self.view();
        paint_scene(surface, &self.graph, &view, self.screen_size);
        if let Some(minimap) = self.minimap() {
            paint_minimap(surface, &minimap, &self.graph, &view, self.screen_size);
        }
    }
}

/// First camera directly under the root, or a new one there. A camera
/// nested in a container would ride along with it, so those are ignored.
fn ensure_camera(graph: &mut SceneGraph) -> NodeIndex {
    let existing = graph
        .children(graph.root)
        .iter()
        .copied()
        .find(|&idx| matches!(graph.graph[idx].kind, NodeKind::Camera { .. }));
    if let Some(camera) = existing {
        return camera;
    }
    let id = NodeId::fresh("camera", |c| graph.index_of(c).is_some());
    let root = graph.root;
    graph.add_node(root, SceneNode::new(id, NodeKind::Camera { zoom: DEFAULT_ZOOM }))
}
