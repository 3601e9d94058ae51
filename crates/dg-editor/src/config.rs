//! Editor configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it
//! changes. Unknown keys are ignored. Out-of-range values are repaired by
//! [`EditorConfig::sanitized`] rather than rejected.

use crate::input::PointerButton;
use dg_core::geometry::Bounds;
use serde::{Deserialize, Serialize};

const DEFAULT_GRID_SIZE: f32 = 10.0;
const DEFAULT_ZOOM_STEP: f32 = 1.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Round dragged positions to the grid.
    pub snap_to_grid: bool,
    /// Grid increment in world units.
    pub grid_size: f32,
    /// Zoom factor applied per scroll tick or zoom shortcut.
    pub zoom_step: f32,
    /// Button that pans the camera when pressed on the background.
    pub pan_button: PointerButton,
    pub minimap: MinimapConfig,
}

/// Screen placement and damping of the minimap overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Fraction of the remaining distance the camera moves per minimap
    /// event, in `[0, 1]`.
    pub sensitivity: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: DEFAULT_GRID_SIZE,
            zoom_step: DEFAULT_ZOOM_STEP,
            pan_button: PointerButton::Middle,
            minimap: MinimapConfig::default(),
        }
    }
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            x: 10.0,
            y: 10.0,
            width: 200.0,
            height: 150.0,
            sensitivity: 0.2,
        }
    }
}

impl MinimapConfig {
    /// Overlay rectangle in screen pixels.
    pub fn rect(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// A zero-area overlay disables the minimap.
    pub fn is_enabled(&self) -> bool {
        !self.rect().is_degenerate()
    }
}

impl EditorConfig {
    /// Parse a JSON config; the result is already sanitized.
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str::<EditorConfig>(text)
            .map(EditorConfig::sanitized)
            .map_err(|e| format!("Config parse error: {e}"))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Config encode error: {e}"))
    }

    /// Replace values the editor cannot work with.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            log::debug!("config: grid_size {} reset", self.grid_size);
            self.grid_size = DEFAULT_GRID_SIZE;
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            log::debug!("config: zoom_step {} reset", self.zoom_step);
            self.zoom_step = DEFAULT_ZOOM_STEP;
        }
        let s = self.minimap.sensitivity;
        self.minimap.sensitivity = if s.is_finite() { s.clamp(0.0, 1.0) } else { 1.0 };
        self
    }

    /// Grid step for drags, if snapping is on.
    pub fn snap_step(&self) -> Option<f32> {
        self.snap_to_grid.then_some(self.grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_gives_defaults() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn partial_json_and_unknown_keys() {
        let cfg = EditorConfig::from_json(
            r#"{ "snap_to_grid": true, "pan_button": "secondary",
                 "minimap": { "width": 300 }, "theme": "dark" }"#,
        )
        .unwrap();
        assert!(cfg.snap_to_grid);
        assert_eq!(cfg.pan_button, PointerButton::Secondary);
        assert_eq!(cfg.minimap.width, 300.0);
        assert_eq!(cfg.minimap.height, 150.0);
        assert_eq!(cfg.snap_step(), Some(10.0));
    }

    #[test]
    fn bad_values_are_sanitized() {
        let cfg = EditorConfig::from_json(
            r#"{ "grid_size": -4, "zoom_step": 0.5, "minimap": { "sensitivity": 7 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.grid_size, 10.0);
        assert_eq!(cfg.zoom_step, 1.1);
        assert_eq!(cfg.minimap.sensitivity, 1.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = EditorConfig::from_json("{ snap").unwrap_err();
        assert!(err.starts_with("Config parse error"));
    }

    #[test]
    fn json_roundtrip() {
        let cfg = EditorConfig::default();
        let text = cfg.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&text).unwrap(), cfg);
    }
}
