//! [`Surface`] backed by a `vello::Scene`.
//!
//! The host owns the scene and presents it; this type only encodes draw
//! calls into it.

use crate::surface::Surface;
use dg_core::geometry::{Bounds, Vec2};
use dg_core::model::Color;
use kurbo::{Affine, Ellipse, Rect, RoundedRect, Shape, Stroke};
use peniko::Fill;
use vello::Scene;

pub struct VelloSurface<'a> {
    scene: &'a mut Scene,
}

impl<'a> VelloSurface<'a> {
    /// Wrap a freshly-reset scene for one frame.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }

    fn fill_shape(&mut self, shape: &impl Shape, color: Color) {
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, to_peniko(color), None, shape);
    }

    fn stroke_shape(&mut self, shape: &impl Shape, width: f32, color: Color) {
        let stroke = Stroke::new(width as f64);
        self.scene
            .stroke(&stroke, Affine::IDENTITY, to_peniko(color), None, shape);
    }
}

impl Surface for VelloSurface<'_> {
    fn fill_rect(&mut self, rect: Bounds, corner_radius: f32, color: Color) {
        let shape = rounded(rect, corner_radius);
        self.fill_shape(&shape, color);
    }

    fn stroke_rect(&mut self, rect: Bounds, corner_radius: f32, width: f32, color: Color) {
        let shape = rounded(rect, corner_radius);
        self.stroke_shape(&shape, width, color);
    }

    fn fill_ellipse(&mut self, rect: Bounds, color: Color) {
        let shape = Ellipse::from_rect(to_kurbo(rect));
        self.fill_shape(&shape, color);
    }

    fn stroke_ellipse(&mut self, rect: Bounds, width: f32, color: Color) {
        let shape = Ellipse::from_rect(to_kurbo(rect));
        self.stroke_shape(&shape, width, color);
    }

    fn draw_text(&mut self, origin: Vec2, text: &str, font_size: f32, _color: Color) {
        // Glyph runs need a font context the host has not handed us yet.
        log::trace!("TEXT {text:?} at ({}, {}) size {font_size}", origin.x, origin.y);
    }
}

fn to_kurbo(rect: Bounds) -> Rect {
    Rect::new(
        rect.x as f64,
        rect.y as f64,
        (rect.x + rect.width) as f64,
        (rect.y + rect.height) as f64,
    )
}

fn rounded(rect: Bounds, corner_radius: f32) -> RoundedRect {
    to_kurbo(rect).to_rounded_rect(corner_radius.max(0.0) as f64)
}

fn to_peniko(color: Color) -> peniko::Color {
    let [r, g, b, a] = color.to_rgba8();
    peniko::Color::from_rgba8(r, g, b, a)
}
