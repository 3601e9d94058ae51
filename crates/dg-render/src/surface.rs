//! Drawing backend abstraction.
//!
//! The painter only speaks in screen-space boxes and colors; a backend
//! turns those into pixels. [`RecordingSurface`] keeps the calls as data
//! for tests and headless hosts.

use dg_core::geometry::{Bounds, Vec2};
use dg_core::model::Color;

/// A target the scene painter can draw onto. All coordinates are screen
/// pixels.
pub trait Surface {
    fn fill_rect(&mut self, rect: Bounds, corner_radius: f32, color: Color);

    fn stroke_rect(&mut self, rect: Bounds, corner_radius: f32, width: f32, color: Color);

    /// Ellipse inscribed in `rect`.
    fn fill_ellipse(&mut self, rect: Bounds, color: Color);

    fn stroke_ellipse(&mut self, rect: Bounds, width: f32, color: Color);

    /// Single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Vec2, text: &str, font_size: f32, color: Color);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Bounds,
        corner_radius: f32,
        color: Color,
    },
    StrokeRect {
        rect: Bounds,
        corner_radius: f32,
        width: f32,
        color: Color,
    },
    FillEllipse {
        rect: Bounds,
        color: Color,
    },
    StrokeEllipse {
        rect: Bounds,
        width: f32,
        color: Color,
    },
    Text {
        origin: Vec2,
        text: String,
        font_size: f32,
        color: Color,
    },
}

impl DrawCommand {
    /// Screen box covered by the command; text reports a zero-size box at
    /// its origin.
    pub fn rect(&self) -> Bounds {
        match self {
            DrawCommand::FillRect { rect, .. }
            | DrawCommand::StrokeRect { rect, .. }
            | DrawCommand::FillEllipse { rect, .. }
            | DrawCommand::StrokeEllipse { rect, .. } => *rect,
            DrawCommand::Text { origin, .. } => Bounds::from_origin_size(*origin, Vec2::ZERO),
        }
    }
}

/// Surface that stores every call in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text of every `draw_text` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Bounds, corner_radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            corner_radius,
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Bounds, corner_radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            corner_radius,
            width,
            color,
        });
    }

    fn fill_ellipse(&mut self, rect: Bounds, color: Color) {
        self.commands.push(DrawCommand::FillEllipse { rect, color });
    }

    fn stroke_ellipse(&mut self, rect: Bounds, width: f32, color: Color) {
        self.commands
            .push(DrawCommand::StrokeEllipse { rect, width, color });
    }

    fn draw_text(&mut self, origin: Vec2, text: &str, font_size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
            font_size,
            color,
        });
    }
}
