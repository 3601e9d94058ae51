//! Loading and saving `.dg` files.
//!
//! Failures come back as `Err(String)`; nothing here touches an editor's
//! current scene, so a failed load leaves it as it was.

use dg_core::emitter::emit_document;
use dg_core::model::SceneGraph;
use dg_core::parser::parse_document_with;
use dg_core::registry::KindRegistry;
use std::fs;
use std::path::{Path, PathBuf};

/// A successfully loaded document.
#[derive(Debug)]
pub struct Document {
    pub path: PathBuf,
    pub graph: SceneGraph,
    /// Tags that had no registered kind and were dropped.
    pub skipped_tags: Vec<String>,
}

impl Document {
    pub fn load(path: impl AsRef<Path>, registry: &KindRegistry) -> Result<Self, String> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
        let outcome = parse_document_with(&text, registry)
            .map_err(|e| format!("Cannot load {}: {e}", path.display()))?;

        log::info!(
            "loaded {} ({} nodes, {} skipped tags)",
            path.display(),
            outcome.graph.graph.node_count(),
            outcome.skipped.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            graph: outcome.graph,
            skipped_tags: outcome.skipped,
        })
    }

    pub fn save(graph: &SceneGraph, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let text = emit_document(graph);
        fs::write(path, &text).map_err(|e| format!("Cannot write {}: {e}", path.display()))?;
        log::info!("saved {} ({} bytes)", path.display(), text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::id::NodeId;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dg-editor-{}-{name}", std::process::id()))
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip.dg");
        let graph = dg_core::parser::parse_document("rect @doc_box { size: 4 4 }\n").unwrap();
        Document::save(&graph, &path).unwrap();

        let doc = Document::load(&path, &KindRegistry::default()).unwrap();
        assert!(doc.graph.index_of(NodeId::intern("doc_box")).is_some());
        assert!(doc.skipped_tags.is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Document::load(temp_path("absent.dg"), &KindRegistry::default()).unwrap_err();
        assert!(err.starts_with("Cannot read"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = temp_path("corrupt.dg");
        fs::write(&path, "rect @broken { size: 1 1").unwrap();
        let err = Document::load(&path, &KindRegistry::default()).unwrap_err();
        assert!(err.starts_with("Cannot load"));
        let _ = fs::remove_file(&path);
    }
}
