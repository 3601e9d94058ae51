//! Emitter: SceneGraph → DG text format.
//!
//! Each node becomes `tag @id { field: value … children { … } }`, with
//! children nested in paint order. Output round-trips through the parser.

use crate::fields::FieldValue;
use crate::model::*;
use petgraph::graph::NodeIndex;
use std::fmt::Write;

/// Emit the root tree of a `SceneGraph` as a DG text document.
/// Detached nodes are not part of the document.
#[must_use]
pub fn emit_document(graph: &SceneGraph) -> String {
    let mut out = String::with_capacity(1024);
    for (i, &child) in graph.children(graph.root).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        emit_node(&mut out, graph, child, 0);
    }
    out
}

/// Emit a single subtree, e.g. for a clipboard preview.
#[must_use]
pub fn emit_subtree(graph: &SceneGraph, idx: NodeIndex) -> String {
    let mut out = String::new();
    emit_node(&mut out, graph, idx, 0);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn emit_node(out: &mut String, graph: &SceneGraph, idx: NodeIndex, depth: usize) {
    let node = &graph.graph[idx];
    if matches!(node.kind, NodeKind::Root) {
        return;
    }

    indent(out, depth);
    let _ = writeln!(out, "{} @{} {{", node.kind.tag(), node.id.as_str());

    for (name, value) in node.fields() {
        indent(out, depth + 1);
        let _ = writeln!(out, "{name}: {}", format_value(&value));
    }

    let children = graph.children(idx);
    if !children.is_empty() {
        indent(out, depth + 1);
        out.push_str("children {\n");
        for &child in children {
            emit_node(out, graph, child, depth + 2);
        }
        indent(out, depth + 1);
        out.push_str("}\n");
    }

    indent(out, depth);
    out.push_str("}\n");
}

fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(n) => format_num(*n),
        FieldValue::Pair(x, y) => format!("{} {}", format_num(*x), format_num(*y)),
        FieldValue::Text(s) => quote(s),
        FieldValue::Color(c) => c.to_hex(),
        FieldValue::Bool(b) => b.to_string(),
    }
}

/// Shortest decimal form that parses back to the same `f32`.
fn format_num(n: f32) -> String {
    if n == 0.0 {
        // Folds -0 into 0.
        return "0".to_string();
    }
    format!("{n}")
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
