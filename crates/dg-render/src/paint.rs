//! Scene graph → surface drawing calls.
//!
//! Walks the tree in child order (back-to-front), maps each node's world
//! box through the camera view and emits fills, strokes and text.
//! Detached top-level nodes are drawn after the root tree, selection
//! outlines after everything else.

use crate::surface::Surface;
use dg_core::NodeIndex;
use dg_core::geometry::{Bounds, Vec2};
use dg_core::minimap::Minimap;
use dg_core::model::{Color, DEFAULT_FONT_SIZE, NodeKind, SceneGraph, Style};
use dg_core::view::View;

pub const SELECTION_COLOR: Color = Color::rgba(0.23, 0.51, 0.96, 1.0);
const SELECTION_WIDTH: f32 = 1.5;

const BLOCK_FILL: Color = Color::rgba(0.97, 0.97, 0.99, 1.0);
const BLOCK_STROKE: Color = Color::rgba(0.35, 0.35, 0.40, 1.0);
const BLOCK_CORNER: f32 = 4.0;
const SHAPE_FILL: Color = Color::rgba(0.82, 0.84, 0.88, 1.0);
const TEXT_COLOR: Color = Color::rgba(0.10, 0.10, 0.12, 1.0);
const LABEL_PADDING: f32 = 6.0;

const MINIMAP_BACKGROUND: Color = Color::rgba(0.10, 0.10, 0.12, 0.75);
const MINIMAP_NODE: Color = Color::rgba(0.75, 0.77, 0.82, 1.0);
const MINIMAP_VIEWPORT: Color = Color::rgba(1.0, 0.80, 0.20, 1.0);

/// Paint every visible node of `graph` as seen through `view`.
///
/// Call once per frame on a cleared surface.
pub fn paint_scene(surface: &mut dyn Surface, graph: &SceneGraph, view: &View, screen_size: Vec2) {
    let mut painter = Painter {
        surface,
        graph,
        view,
        screen_size,
        selected: Vec::new(),
    };
    painter.paint_node(graph.root);
    for orphan in graph.top_level() {
        painter.paint_node(orphan);
    }
    painter.paint_outlines();
}

/// Paint the minimap overlay: background, content boxes and the
/// current viewport. Drawn on top of the scene.
pub fn paint_minimap(
    surface: &mut dyn Surface,
    minimap: &Minimap,
    graph: &SceneGraph,
    view: &View,
    screen_size: Vec2,
) {
    surface.fill_rect(minimap.rect, 4.0, MINIMAP_BACKGROUND);

    let mut stack: Vec<NodeIndex> = graph.children(graph.root).iter().rev().copied().collect();
    while let Some(idx) = stack.pop() {
        let node = &graph.graph[idx];
        if !node.visible {
            continue;
        }
        if node.kind.info().content
            && let Some(b) = minimap.world_rect_to_screen(graph.world_bounds(idx))
            && b.intersects(&minimap.rect)
        {
            surface.fill_rect(b, 0.0, MINIMAP_NODE);
        }
        stack.extend(graph.children(idx).iter().rev());
    }

    if let Some(viewport) = minimap.world_rect_to_screen(view.visible_world(screen_size)) {
        surface.stroke_rect(viewport, 0.0, 1.0, MINIMAP_VIEWPORT);
    }
}

struct Painter<'a> {
    surface: &'a mut dyn Surface,
    graph: &'a SceneGraph,
    view: &'a View,
    screen_size: Vec2,
    selected: Vec<NodeIndex>,
}

impl Painter<'_> {
    fn screen_box(&self, idx: NodeIndex) -> Bounds {
        let world = self.graph.world_bounds(idx);
        Bounds::from_origin_size(
            self.view.world_to_screen(world.origin(), self.screen_size),
            world.size() * self.view.zoom,
        )
    }

    fn paint_node(&mut self, idx: NodeIndex) {
        let graph = self.graph;
        let node = &graph.graph[idx];
        if !node.visible {
            return;
        }

        let rect = self.screen_box(idx);
        let zoom = self.view.zoom;
        let style = &node.style;

        match &node.kind {
            NodeKind::Root | NodeKind::Camera { .. } => {}

            NodeKind::Group => {
                if let Some(fill) = style.fill {
                    self.surface.fill_rect(rect, corner(style, 0.0, zoom), fill);
                }
                self.stroke_box(rect, style, None);
            }

            NodeKind::Block { label } => {
                let radius = corner(style, BLOCK_CORNER, zoom);
                self.surface
                    .fill_rect(rect, radius, style.fill.unwrap_or(BLOCK_FILL));
                self.stroke_box(rect, style, Some(BLOCK_STROKE));
                if !label.is_empty() {
                    let origin = rect.origin() + Vec2::new(LABEL_PADDING, LABEL_PADDING) * zoom;
                    self.surface
                        .draw_text(origin, label, DEFAULT_FONT_SIZE * zoom, TEXT_COLOR);
                }
            }

            NodeKind::Text { content, font_size } => {
                self.surface.draw_text(
                    rect.origin(),
                    content,
                    font_size * zoom,
                    style.fill.unwrap_or(TEXT_COLOR),
                );
            }

            NodeKind::Rect => {
                let radius = corner(style, 0.0, zoom);
                self.surface
                    .fill_rect(rect, radius, style.fill.unwrap_or(SHAPE_FILL));
                self.stroke_box(rect, style, None);
            }

            NodeKind::Ellipse => {
                self.surface
                    .fill_ellipse(rect, style.fill.unwrap_or(SHAPE_FILL));
                if let Some(color) = style.stroke {
                    self.surface
                        .stroke_ellipse(rect, stroke_width(style, zoom), color);
                }
            }
        }

        if node.is_selected() {
            self.selected.push(idx);
        }

        for &child in graph.children(idx) {
            self.paint_node(child);
        }
    }

    fn stroke_box(&mut self, rect: Bounds, style: &Style, fallback: Option<Color>) {
        if let Some(color) = style.stroke.or(fallback) {
            let default_radius = if fallback.is_some() { BLOCK_CORNER } else { 0.0 };
            let radius = corner(style, default_radius, self.view.zoom);
            self.surface
                .stroke_rect(rect, radius, stroke_width(style, self.view.zoom), color);
        }
    }

    fn paint_outlines(&mut self) {
        let selected = std::mem::take(&mut self.selected);
        log::trace!("paint: {} selection outline(s)", selected.len());
        for idx in selected {
            let rect = self.screen_box(idx);
            self.surface
                .stroke_rect(rect, 0.0, SELECTION_WIDTH, SELECTION_COLOR);
        }
    }
}

fn corner(style: &Style, default: f32, zoom: f32) -> f32 {
    style.corner_radius.unwrap_or(default) * zoom
}

fn stroke_width(style: &Style, zoom: f32) -> f32 {
    style.stroke_width.unwrap_or(1.0) * zoom
}
