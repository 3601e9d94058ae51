//! Field reflection for scene nodes.
//!
//! The document codec never touches node internals directly: the emitter
//! asks a node for its `(name, value)` pairs and the parser feeds parsed
//! pairs back through [`SceneNode::apply_field`].

use crate::geometry::Vec2;
use crate::model::{Color, DEFAULT_FONT_SIZE, NodeKind, SceneNode};

/// A single serializable field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f32),
    Pair(f32, f32),
    Text(String),
    Color(Color),
    Bool(bool),
}

impl FieldValue {
    fn as_number(&self) -> Option<f32> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn as_pair(&self) -> Option<Vec2> {
        match self {
            FieldValue::Pair(x, y) => Some(Vec2::new(*x, *y)),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn as_color(&self) -> Option<Color> {
        match self {
            FieldValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl SceneNode {
    /// The node's persisted fields, in emission order. Defaults are left out.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut out = Vec::new();
        let pos = self.position();
        if pos != Vec2::ZERO {
            out.push(("at", FieldValue::Pair(pos.x, pos.y)));
        }
        let size = self.size();
        if size != Vec2::ZERO {
            out.push(("size", FieldValue::Pair(size.x, size.y)));
        }

        match &self.kind {
            NodeKind::Block { label } if !label.is_empty() => {
                out.push(("label", FieldValue::Text(label.clone())));
            }
            NodeKind::Text { content, font_size } => {
                out.push(("content", FieldValue::Text(content.clone())));
                if *font_size != DEFAULT_FONT_SIZE {
                    out.push(("font_size", FieldValue::Number(*font_size)));
                }
            }
            NodeKind::Camera { zoom } => out.push(("zoom", FieldValue::Number(*zoom))),
            _ => {}
        }

        if let Some(fill) = self.style.fill {
            out.push(("fill", FieldValue::Color(fill)));
        }
        if let Some(stroke) = self.style.stroke {
            out.push(("stroke", FieldValue::Color(stroke)));
        }
        if let Some(w) = self.style.stroke_width {
            out.push(("stroke_width", FieldValue::Number(w)));
        }
        if let Some(r) = self.style.corner_radius {
            out.push(("corner", FieldValue::Number(r)));
        }
        if !self.visible {
            out.push(("hidden", FieldValue::Bool(true)));
        }
        if self.locked {
            out.push(("locked", FieldValue::Bool(true)));
        }
        out
    }

    /// Populate one field on a node that is not yet in a graph.
    /// Returns false for unknown names or mismatched value types.
    pub fn apply_field(&mut self, name: &str, value: &FieldValue) -> bool {
        let applied = match name {
            "at" => value.as_pair().map(|p| self.position = p),
            "size" => value.as_pair().map(|s| self.size = s.max(Vec2::ZERO)),
            "fill" => value.as_color().map(|c| self.style.fill = Some(c)),
            "stroke" => value.as_color().map(|c| self.style.stroke = Some(c)),
            "stroke_width" => value.as_number().map(|n| self.style.stroke_width = Some(n)),
            "corner" => value.as_number().map(|n| self.style.corner_radius = Some(n)),
            "hidden" => value.as_bool().map(|b| self.visible = !b),
            "locked" => value.as_bool().map(|b| self.locked = b),
            _ => self.apply_kind_field(name, value),
        };
        applied.is_some()
    }

    fn apply_kind_field(&mut self, name: &str, value: &FieldValue) -> Option<()> {
        match (&mut self.kind, name) {
            (NodeKind::Block { label }, "label") => {
                *label = value.as_text()?.to_string();
            }
            (NodeKind::Text { content, .. }, "content") => {
                *content = value.as_text()?.to_string();
            }
            (NodeKind::Text { font_size, .. }, "font_size") => {
                *font_size = value.as_number()?.max(1.0);
            }
            (NodeKind::Camera { zoom }, "zoom") => {
                *zoom = crate::view::clamp_zoom(value.as_number()?);
            }
            _ => return None,
        }
        Some(())
    }
}
