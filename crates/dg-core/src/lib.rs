pub mod emitter;
pub mod fields;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod minimap;
pub mod model;
pub mod parser;
pub mod registry;
pub mod selection;
pub mod snapshot;
pub mod view;

pub use emitter::{emit_document, emit_subtree};
pub use fields::FieldValue;
pub use geometry::{Bounds, Vec2};
pub use id::NodeId;
pub use minimap::{MAX_MINIMAP_TARGET, Minimap, follow};
pub use model::*;
pub use parser::{ParseOutcome, parse_document, parse_document_with};
pub use registry::{KindFactory, KindRegistry};
pub use selection::SelectionContext;
pub use snapshot::NodeSnapshot;
pub use view::{MAX_ZOOM, MIN_ZOOM, View, clamp_zoom};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
