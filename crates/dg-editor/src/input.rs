//! Platform-agnostic input events.
//!
//! The host normalizes mouse, touch and keyboard input into
//! `InputEvent`s, in screen pixels, and queues them with a flag saying
//! whether its own UI already handled the event.

use dg_core::geometry::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },

    PointerMove {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    PointerUp {
        x: f32,
        y: f32,
        button: PointerButton,
    },

    /// Wheel or pinch at `(x, y)`. Positive `delta` zooms in.
    Scroll { x: f32, y: f32, delta: f32 },

    /// `key` is the platform key name (e.g. `"a"`, `"Delete"`, `"Escape"`).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self::down_with(x, y, PointerButton::Primary, Modifiers::NONE)
    }

    pub fn down_with(x: f32, y: f32, button: PointerButton, modifiers: Modifiers) -> Self {
        InputEvent::PointerDown {
            x,
            y,
            button,
            modifiers,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        InputEvent::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        InputEvent::PointerUp {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        InputEvent::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Screen position for pointer and scroll events.
    pub fn screen_position(&self) -> Option<Vec2> {
        match self {
            InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerMove { x, y, .. }
            | InputEvent::PointerUp { x, y, .. }
            | InputEvent::Scroll { x, y, .. } => Some(Vec2::new(*x, *y)),
            InputEvent::Key { .. } => None,
        }
    }
}

/// An event as delivered by the host, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedEvent {
    pub event: InputEvent,
    /// The host's own UI (menus, panels) already consumed this event.
    pub host_captured: bool,
}

impl QueuedEvent {
    pub fn new(event: InputEvent) -> Self {
        Self {
            event,
            host_captured: false,
        }
    }

    pub fn captured(event: InputEvent) -> Self {
        Self {
            event,
            host_captured: true,
        }
    }
}

impl From<InputEvent> for QueuedEvent {
    fn from(event: InputEvent) -> Self {
        Self::new(event)
    }
}
