//! Core scene-tree data model for DG documents.
//!
//! Nodes live in an arena (`StableDiGraph`) and refer to each other by
//! stable `NodeIndex`. Edges go parent → child; each parent also keeps an
//! explicit child order, which is the paint order (back-to-front) and the
//! reverse of the hit-test order.
//!
//! Positions are local (offset from the parent). World positions are
//! derived and cached per node: mutations invalidate eagerly down the
//! subtree, reads recompute lazily.

use crate::geometry::{Bounds, Vec2};
use crate::id::NodeId;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::Cell;
use std::collections::HashMap;

// ─── Colors & Style ──────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`; the leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        if bytes.len() != 6 && bytes.len() != 8 {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            let v = hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?;
            Some(v as f32 / 255.0)
        };
        let a = if bytes.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Visual style of a node. `None` fields fall back to per-kind defaults
/// chosen by the painter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f32>,
    pub corner_radius: Option<f32>,
}

// ─── Node kinds ──────────────────────────────────────────────────────────

/// Zoom applied to a freshly created camera.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Font size for text nodes without an explicit one.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// The node kinds in the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of the document. Never serialized, never dragged.
    Root,

    /// Invisible container.
    Group,

    /// Labelled box; the main diagram element. Can hold children.
    Block { label: String },

    /// Text label.
    Text { content: String, font_size: f32 },

    /// Rectangle primitive.
    Rect,

    /// Ellipse primitive, inscribed in the node box.
    Ellipse,

    /// Camera. Its world position is the view anchor.
    Camera { zoom: f32 },
}

/// Static per-kind behavior, looked up by tag instead of matching on the
/// kind at every call site.
#[derive(Debug)]
pub struct KindInfo {
    /// Document tag and id prefix.
    pub tag: &'static str,
    /// Single-glyph icon for the tree panel.
    pub icon: &'static str,
    /// Accepts children dropped onto it in the tree panel.
    pub container: bool,
    /// Starts a drag session on primary pointer-down.
    pub draggable: bool,
    /// Painted and counted in the minimap's content bounds.
    pub content: bool,
}

const KIND_TABLE: &[KindInfo] = &[
    KindInfo { tag: "root", icon: "◎", container: true, draggable: false, content: false },
    KindInfo { tag: "group", icon: "▣", container: true, draggable: true, content: true },
    KindInfo { tag: "block", icon: "■", container: true, draggable: true, content: true },
    KindInfo { tag: "text", icon: "T", container: false, draggable: true, content: true },
    KindInfo { tag: "rect", icon: "□", container: false, draggable: true, content: true },
    KindInfo { tag: "ellipse", icon: "○", container: false, draggable: true, content: true },
    KindInfo { tag: "camera", icon: "◉", container: false, draggable: false, content: false },
];

impl NodeKind {
    pub fn info(&self) -> &'static KindInfo {
        let slot = match self {
            NodeKind::Root => 0,
            NodeKind::Group => 1,
            NodeKind::Block { .. } => 2,
            NodeKind::Text { .. } => 3,
            NodeKind::Rect => 4,
            NodeKind::Ellipse => 5,
            NodeKind::Camera { .. } => 6,
        };
        &KIND_TABLE[slot]
    }

    pub fn tag(&self) -> &'static str {
        self.info().tag
    }

    pub fn is_container(&self) -> bool {
        self.info().container
    }

    pub fn is_draggable(&self) -> bool {
        self.info().draggable
    }
}

// ─── Scene nodes ─────────────────────────────────────────────────────────

/// A single node in the scene tree.
///
/// Position and size are only writable through [`SceneGraph`] so that
/// cache invalidation and parent growth cannot be skipped.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Identity string (e.g. `@start`). Unique within a graph.
    pub id: NodeId,

    /// What kind of element this is.
    pub kind: NodeKind,

    /// Inline style.
    pub style: Style,

    /// Hidden nodes (and their subtrees) are neither painted nor hit.
    pub visible: bool,

    /// Locked nodes do not start drags; the pointer falls to their parent.
    pub locked: bool,

    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    selected: bool,

    /// Cached world position, valid only while `dirty` is false.
    world: Cell<Vec2>,
    dirty: Cell<bool>,
}

impl SceneNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            style: Style::default(),
            visible: true,
            locked: false,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            selected: false,
            world: Cell::new(Vec2::ZERO),
            dirty: Cell::new(true),
        }
    }

    /// Builder: initial local position. Only meaningful before insertion.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self.dirty.set(true);
        self
    }

    /// Builder: initial size (negative components clamp to zero).
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height).max(Vec2::ZERO);
        self
    }

    /// Local position (offset from the parent).
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Local bounding-box size.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the cached world position needs recomputing.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Local box in the parent's coordinate space.
    pub fn local_bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.position, self.size)
    }
}

// ─── Scene graph ─────────────────────────────────────────────────────────

/// Child lists are short in practice; four inline slots avoid most
/// allocations.
pub type ChildList = SmallVec<[NodeIndex; 4]>;

/// The complete DG document: an arena of `SceneNode` values forming a
/// tree under `root`, plus any detached (parentless) nodes.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// The underlying arena; edges go parent → child.
    pub graph: StableDiGraph<SceneNode, ()>,

    /// The root node index.
    pub root: NodeIndex,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,

    /// Paint order of each parent's children.
    child_order: HashMap<NodeIndex, ChildList>,
}

impl SceneGraph {
    /// Create a new scene with an empty root.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_id = NodeId::intern("root");
        let root = graph.add_node(SceneNode::new(root_id, NodeKind::Root));

        let mut id_index = HashMap::new();
        id_index.insert(root_id, root);

        Self {
            graph,
            root,
            id_index,
            child_order: HashMap::new(),
        }
    }

    /// Put a node into the arena without a parent.
    pub fn insert(&mut self, node: SceneNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    /// Insert `node` and attach it as the last child of `parent`.
    pub fn add_node(&mut self, parent: NodeIndex, node: SceneNode) -> NodeIndex {
        let idx = self.insert(node);
        if !self.add_child(parent, idx) {
            log::debug!("add_node: {} left detached", self.graph[idx].id);
        }
        idx
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.graph.contains_node(idx)
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&SceneNode> {
        self.graph.node_weight(idx)
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut SceneNode> {
        self.graph.node_weight_mut(idx)
    }

    /// Look up a node by its `@id`.
    pub fn get_by_id(&self, id: NodeId) -> Option<&SceneNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Get the index for a NodeId.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Change a node's identity, keeping the index in sync.
    /// Returns false if `id` is already used by another node.
    pub fn rename(&mut self, idx: NodeIndex, id: NodeId) -> bool {
        match self.index_of(id) {
            Some(existing) if existing != idx => return false,
            _ => {}
        }
        let Some(node) = self.graph.node_weight_mut(idx) else {
            return false;
        };
        let old = std::mem::replace(&mut node.id, id);
        self.id_index.remove(&old);
        self.id_index.insert(id, idx);
        true
    }

    /// Get the parent index of a node; `None` for the root and detached nodes.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
    }

    /// Children in paint (insertion) order.
    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.child_order
            .get(&idx)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Parentless nodes other than the root, in arena order.
    pub fn top_level(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| idx != self.root && self.parent(idx).is_none())
            .collect()
    }

    /// True if `ancestor` is a parent/grandparent/etc. of `descendant`.
    /// A node is not its own ancestor.
    pub fn is_ancestor(&self, ancestor: NodeIndex, descendant: NodeIndex) -> bool {
        let mut current = descendant;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// `idx` followed by each of its ancestors up to its top-level node.
    pub fn ancestors(&self, idx: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
        let mut chain = SmallVec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            chain.push(i);
            current = self.parent(i);
        }
        chain
    }

    /// Every node below `idx` (excluding `idx`), depth-first pre-order.
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIndex> = self.children(idx).iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            out.push(i);
            stack.extend(self.children(i).iter().rev().copied());
        }
        out
    }

    // ─── Structure edits ─────────────────────────────────────────────────

    /// Attach `child` as the last child of `parent`.
    ///
    /// Rejected (returns false, nothing changes) when either index is stale,
    /// `child` is the root, or `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        self.insert_child(parent, child, usize::MAX)
    }

    /// Attach `child` under `parent` at position `index` (clamped).
    pub fn insert_child(&mut self, parent: NodeIndex, child: NodeIndex, index: usize) -> bool {
        if !self.contains(parent) || !self.contains(child) {
            log::debug!("insert_child: stale index");
            return false;
        }
        if child == self.root || child == parent || self.is_ancestor(child, parent) {
            log::debug!(
                "insert_child: {} under {} would create a cycle",
                self.graph[child].id,
                self.graph[parent].id
            );
            return false;
        }

        self.detach(child);
        let order = self.child_order.entry(parent).or_default();
        let index = index.min(order.len());
        order.insert(index, child);
        self.graph.add_edge(parent, child, ());

        self.mark_dirty(child);
        self.grow_to_fit(parent, child);
        true
    }

    /// Detach `child` from `parent` and hand it back as a top-level node.
    /// `None` if `child` is not a direct child of `parent`.
    pub fn remove_child(&mut self, parent: NodeIndex, child: NodeIndex) -> Option<NodeIndex> {
        if self.parent(child) != Some(parent) {
            return None;
        }
        self.detach(child);
        self.mark_dirty(child);
        Some(child)
    }

    fn detach(&mut self, child: NodeIndex) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(edge) = self.graph.find_edge(parent, child) {
            self.graph.remove_edge(edge);
        }
        if let Some(order) = self.child_order.get_mut(&parent) {
            order.retain(|c| *c != child);
        }
    }

    /// Destroy `idx` and its whole subtree, returning the removed nodes
    /// (pre-order). The root cannot be deleted.
    ///
    /// Callers holding indices into the subtree (selection, sessions) must
    /// drop them first: the arena reuses vacant slots.
    pub fn delete_subtree(&mut self, idx: NodeIndex) -> Vec<SceneNode> {
        if idx == self.root || !self.contains(idx) {
            return Vec::new();
        }
        let mut doomed = vec![idx];
        doomed.extend(self.descendants(idx));
        self.detach(idx);

        let mut removed = Vec::with_capacity(doomed.len());
        for i in doomed {
            self.child_order.remove(&i);
            if let Some(node) = self.graph.remove_node(i) {
                if self.id_index.get(&node.id) == Some(&i) {
                    self.id_index.remove(&node.id);
                }
                removed.push(node);
            }
        }
        removed
    }

    /// Grow `parent` (and, transitively, its ancestors) so its local box
    /// covers `child`'s far edge. Sizes never shrink here.
    fn grow_to_fit(&mut self, parent: NodeIndex, child: NodeIndex) {
        let mut parent = parent;
        let mut child = child;
        loop {
            let far = {
                let c = &self.graph[child];
                c.position + c.size
            };
            let p = &mut self.graph[parent];
            let grown = p.size.max(far);
            if grown == p.size {
                break;
            }
            p.size = grown;
            match self.parent(parent) {
                Some(grand) => {
                    child = parent;
                    parent = grand;
                }
                None => break,
            }
        }
    }

    // ─── Position, size, cache ───────────────────────────────────────────

    /// Mark `idx` and every descendant dirty, depth-first.
    pub fn mark_dirty(&self, idx: NodeIndex) {
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            if let Some(node) = self.graph.node_weight(i) {
                node.dirty.set(true);
                stack.extend_from_slice(self.children(i));
            }
        }
    }

    /// Position relative to the scene root (or to the top-level ancestor
    /// for detached subtrees). Cached until invalidated.
    ///
    /// Panics if `idx` is not in the arena.
    pub fn world_position(&self, idx: NodeIndex) -> Vec2 {
        let node = &self.graph[idx];
        if !node.dirty.get() {
            return node.world.get();
        }

        // Climb to the nearest clean ancestor, then refresh back down.
        let mut stale: Vec<NodeIndex> = vec![idx];
        let mut base = Vec2::ZERO;
        let mut cursor = self.parent(idx);
        while let Some(p) = cursor {
            let parent = &self.graph[p];
            if !parent.dirty.get() {
                base = parent.world.get();
                break;
            }
            stale.push(p);
            cursor = self.parent(p);
        }

        for &i in stale.iter().rev() {
            let n = &self.graph[i];
            base += n.position;
            n.world.set(base);
            n.dirty.set(false);
        }
        base
    }

    /// World-space box of a node.
    pub fn world_bounds(&self, idx: NodeIndex) -> Bounds {
        Bounds::from_origin_size(self.world_position(idx), self.graph[idx].size)
    }

    /// Set the local position and invalidate the subtree.
    /// Non-finite positions are ignored.
    pub fn set_position(&mut self, idx: NodeIndex, position: Vec2) {
        if !position.is_finite() {
            log::debug!("set_position: ignoring non-finite {position:?}");
            return;
        }
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.position = position;
            self.mark_dirty(idx);
        }
    }

    /// Place a node so that its world position becomes `world`.
    pub fn set_world_position(&mut self, idx: NodeIndex, world: Vec2) {
        let parent_world = self
            .parent(idx)
            .map(|p| self.world_position(p))
            .unwrap_or(Vec2::ZERO);
        self.set_position(idx, world - parent_world);
    }

    /// Set the local size; negative components clamp to zero.
    pub fn set_size(&mut self, idx: NodeIndex, size: Vec2) {
        if !size.is_finite() {
            return;
        }
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.size = size.max(Vec2::ZERO);
        }
    }

    pub(crate) fn set_selected_flag(&mut self, idx: NodeIndex, selected: bool) {
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.selected = selected;
        }
    }

    /// Union of the world boxes of all visible content nodes in the root
    /// tree. `None` for an empty scene.
    pub fn content_bounds(&self) -> Option<Bounds> {
        let mut acc: Option<Bounds> = None;
        let mut stack = vec![self.root];
        while let Some(i) = stack.pop() {
            let node = &self.graph[i];
            if !node.visible {
                continue;
            }
            if node.kind.info().content {
                let b = self.world_bounds(i);
                acc = Some(match acc {
                    Some(a) => a.union(&b),
                    None => b,
                });
            }
            stack.extend_from_slice(self.children(i));
        }
        acc
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Move a child one step backward in z-order. Returns true if changed.
    pub fn send_backward(&mut self, child: NodeIndex) -> bool {
        self.move_in_order(child, |pos, _| pos.checked_sub(1))
    }

    /// Move a child one step forward in z-order. Returns true if changed.
    pub fn bring_forward(&mut self, child: NodeIndex) -> bool {
        self.move_in_order(child, |pos, len| (pos + 1 < len).then_some(pos + 1))
    }

    /// Move a child to the back of z-order (first child).
    pub fn send_to_back(&mut self, child: NodeIndex) -> bool {
        self.move_in_order(child, |pos, _| (pos > 0).then_some(0))
    }

    /// Move a child to the front of z-order (last child).
    pub fn bring_to_front(&mut self, child: NodeIndex) -> bool {
        self.move_in_order(child, |pos, len| (pos + 1 < len).then_some(len - 1))
    }

    fn move_in_order(
        &mut self,
        child: NodeIndex,
        target: impl FnOnce(usize, usize) -> Option<usize>,
    ) -> bool {
        let Some(parent) = self.parent(child) else {
            return false;
        };
        let Some(order) = self.child_order.get_mut(&parent) else {
            return false;
        };
        let Some(pos) = order.iter().position(|&c| c == child) else {
            return false;
        };
        let Some(to) = target(pos, order.len()) else {
            return false;
        };
        let moved = order.remove(pos);
        order.insert(to, moved);
        true
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
