//! Factory table from document tags to node kinds.
//!
//! The parser looks each tag up here; tags with no entry are skipped.
//! Hosts can register aliases (e.g. `box` → `Rect`) before loading.

use crate::model::{DEFAULT_FONT_SIZE, DEFAULT_ZOOM, NodeKind};
use std::collections::HashMap;

/// Builds a default-valued kind for a tag.
pub type KindFactory = fn() -> NodeKind;

#[derive(Debug, Clone)]
pub struct KindRegistry {
    factories: HashMap<String, KindFactory>,
}

impl KindRegistry {
    /// A registry with no entries.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register (or replace) the factory for `tag`.
    pub fn register(&mut self, tag: &str, factory: KindFactory) {
        self.factories.insert(tag.to_string(), factory);
    }

    /// Build the kind for `tag`, if registered.
    pub fn create(&self, tag: &str) -> Option<NodeKind> {
        self.factories.get(tag).map(|f| f())
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }
}

impl Default for KindRegistry {
    /// Every built-in kind except the root.
    fn default() -> Self {
        let mut reg = Self::empty();
        reg.register("group", || NodeKind::Group);
        reg.register("block", || NodeKind::Block {
            label: String::new(),
        });
        reg.register("text", || NodeKind::Text {
            content: String::new(),
            font_size: DEFAULT_FONT_SIZE,
        });
        reg.register("rect", || NodeKind::Rect);
        reg.register("ellipse", || NodeKind::Ellipse);
        reg.register("camera", || NodeKind::Camera { zoom: DEFAULT_ZOOM });
        reg
    }
}
