//! Interactive editing for DG scenes: event dispatch, interaction
//! sessions, shortcuts, the tree panel model and document I/O.

pub mod config;
pub mod dispatch;
pub mod document;
pub mod editor;
pub mod input;
pub mod interaction;
pub mod shortcuts;
pub mod tree;

pub use config::{EditorConfig, MinimapConfig};
pub use dispatch::{Dispatch, Target, hit_chain};
pub use document::Document;
pub use editor::{Editor, Notice};
pub use input::{InputEvent, Modifiers, PointerButton, QueuedEvent};
pub use interaction::Session;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tree::{TreeDrop, TreeRow, drop_row, tree_rows};
