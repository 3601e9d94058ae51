//! Painting for DG scenes.
//!
//! [`paint::paint_scene`] turns a scene graph plus a camera view into
//! calls on a [`Surface`]. [`VelloSurface`] encodes them into a
//! `vello::Scene`; [`RecordingSurface`] keeps them for inspection.

pub mod paint;
pub mod surface;
pub mod vello_surface;

pub use paint::{SELECTION_COLOR, paint_minimap, paint_scene};
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use vello_surface::VelloSurface;
