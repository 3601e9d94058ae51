//! Integration tests: parse → emit → re-parse round-trip.
//!
//! Verifies that no data is lost when converting DG text → SceneGraph → DG text.

use dg_core::emitter::emit_document;
use dg_core::geometry::Vec2;
use dg_core::id::NodeId;
use dg_core::model::*;
use dg_core::parser::{parse_document, parse_document_with};
use dg_core::registry::KindRegistry;
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn ids_in_order(graph: &SceneGraph, parent: dg_core::NodeIndex) -> Vec<String> {
    graph
        .children(parent)
        .iter()
        .map(|&c| graph.graph[c].id.as_str().to_string())
        .collect()
}

/// Parse, emit, re-parse, and compare every node by id.
fn assert_roundtrip_preserves(input: &str) {
    let graph1 = parse_document(input).expect("first parse failed");
    let emitted = emit_document(&graph1);
    let graph2 = parse_document(&emitted).expect("re-parse failed");

    assert_eq!(
        graph1.graph.node_count(),
        graph2.graph.node_count(),
        "node count mismatch after round-trip.\nOriginal:\n{input}\nEmitted:\n{emitted}"
    );

    for (&id, &idx1) in &graph1.id_index {
        let idx2 = graph2
            .index_of(id)
            .unwrap_or_else(|| panic!("node ID {id:?} lost after round-trip"));
        let (n1, n2) = (&graph1.graph[idx1], &graph2.graph[idx2]);
        assert_eq!(n1.kind, n2.kind, "kind changed for {id}");
        assert_eq!(n1.style, n2.style, "style changed for {id}");
        assert_eq!(n1.position(), n2.position(), "position changed for {id}");
        assert_eq!(n1.size(), n2.size(), "size changed for {id}");
        assert_eq!(n1.visible, n2.visible);
        assert_eq!(n1.locked, n2.locked);
        assert_eq!(ids_in_order(&graph1, idx1), ids_in_order(&graph2, idx2));
    }

    // Emission is a fixed point after the first parse.
    assert_eq!(emit_document(&graph2), emitted);
}

// ─── Fixture-based tests ─────────────────────────────────────────────────

#[test]
fn roundtrip_flowchart_fixture() {
    assert_roundtrip_preserves(include_str!("fixtures/flowchart.dg"));
}

#[test]
fn roundtrip_unknown_tags_fixture() {
    assert_roundtrip_preserves(include_str!("fixtures/unknown_tags.dg"));
}

#[test]
fn flowchart_fields_are_read() {
    let sg = parse_document(include_str!("fixtures/flowchart.dg")).unwrap();

    assert_eq!(
        ids_in_order(&sg, sg.root),
        vec!["main_camera", "start", "decide", "legend", "scratch"]
    );

    let caption = sg.index_of(NodeId::intern("start_caption")).unwrap();
    assert_eq!(sg.world_position(caption), Vec2::new(52.0, 52.0));
    assert_eq!(
        sg.graph[caption].kind,
        NodeKind::Text {
            content: "Begin \"here\"".into(),
            font_size: 16.0,
        }
    );

    let camera = sg.get_by_id(NodeId::intern("main_camera")).unwrap();
    assert_eq!(camera.kind, NodeKind::Camera { zoom: 1.5 });
    assert_eq!(camera.position(), Vec2::new(-40.0, -20.0));

    let start = sg.get_by_id(NodeId::intern("start")).unwrap();
    assert_eq!(start.style.stroke_width, Some(2.0));
    assert_eq!(start.style.corner_radius, Some(8.0));
    assert_eq!(start.style.fill, Color::from_hex("#FFE08A"));

    assert!(sg.get_by_id(NodeId::intern("legend")).unwrap().locked);
    assert!(!sg.get_by_id(NodeId::intern("scratch")).unwrap().visible);
}

#[test]
fn containers_grow_to_fit_parsed_children() {
    let sg = parse_document(include_str!("fixtures/flowchart.dg")).unwrap();
    let legend = sg.get_by_id(NodeId::intern("legend")).unwrap();
    assert_eq!(legend.size(), Vec2::new(104.0, 16.0));
}

// ─── Unknown content ─────────────────────────────────────────────────────

#[test]
fn unknown_tags_skipped_while_siblings_load() {
    let outcome = parse_document_with(
        include_str!("fixtures/unknown_tags.dg"),
        &KindRegistry::default(),
    )
    .unwrap();
    let sg = &outcome.graph;

    assert_eq!(outcome.skipped, vec!["sticker".to_string()]);
    assert_eq!(ids_in_order(sg, sg.root), vec!["before", "after"]);
    assert!(sg.index_of(NodeId::intern("sparkle")).is_none());
    assert!(sg.index_of(NodeId::intern("inside_sticker")).is_none());

    let after = sg.get_by_id(NodeId::intern("after")).unwrap();
    assert_eq!(after.kind, NodeKind::Block { label: "Still here".into() });
}

#[test]
fn registered_alias_loads_former_unknown_tag() {
    let mut registry = KindRegistry::default();
    registry.register("sticker", || NodeKind::Rect);

    let outcome =
        parse_document_with(include_str!("fixtures/unknown_tags.dg"), &registry).unwrap();
    assert!(outcome.skipped.is_empty());

    let sparkle = outcome.graph.get_by_id(NodeId::intern("sparkle")).unwrap();
    assert_eq!(sparkle.kind, NodeKind::Rect);
    // Emitted under the canonical tag.
    assert!(emit_document(&outcome.graph).contains("rect @sparkle {"));
}

// ─── Failures ────────────────────────────────────────────────────────────

#[test]
fn truncated_document_fails_whole_parse() {
    let full = include_str!("fixtures/flowchart.dg");
    let cut = &full[..full.len() / 2];
    let err = parse_document(cut).unwrap_err();
    assert!(err.contains("parse error"), "unexpected message: {err}");
}

#[test]
fn empty_and_comment_only_documents_are_valid() {
    let sg = parse_document("").unwrap();
    assert_eq!(sg.graph.node_count(), 1);

    let sg = parse_document("# nothing here\n\n# still nothing\n").unwrap();
    assert!(sg.children(sg.root).is_empty());
}
