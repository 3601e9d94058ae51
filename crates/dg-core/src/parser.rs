//! Parser for the DG text format → SceneGraph.
//!
//! Built on `winnow` 0.7. A document is a sequence of nodes:
//!
//! ```text
//! # comment
//! block @start {
//!   at: 10 20
//!   size: 120 60
//!   label: "Start"
//!   children {
//!     text @caption { content: "hi" }
//!   }
//! }
//! ```
//!
//! Tags are resolved through a [`KindRegistry`]; unknown tags are skipped
//! together with their children. Unknown fields and values that do not
//! parse are ignored. Anything that breaks the block structure fails the
//! whole document.

use crate::fields::FieldValue;
use crate::id::NodeId;
use crate::model::*;
use crate::registry::KindRegistry;
use petgraph::graph::NodeIndex;
use winnow::ascii::space0;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Result of a successful parse.
#[derive(Debug)]
pub struct ParseOutcome {
    pub graph: SceneGraph,
    /// Tags that had no registered kind, in document order.
    pub skipped: Vec<String>,
}

/// Parse a DG document with the built-in kinds.
#[must_use = "parsing result should be used"]
pub fn parse_document(input: &str) -> Result<SceneGraph, String> {
    parse_document_with(input, &KindRegistry::default()).map(|outcome| outcome.graph)
}

/// Parse a DG document, resolving tags through `registry`.
#[must_use = "parsing result should be used"]
pub fn parse_document_with(input: &str, registry: &KindRegistry) -> Result<ParseOutcome, String> {
    let mut rest = input;
    let mut parsed = Vec::new();

    skip_ws_and_comments(&mut rest);
    while !rest.is_empty() {
        let node = parse_node
            .parse_next(&mut rest)
            .map_err(|e| format!("Node parse error on line {}: {e}", line_of(input, rest)))?;
        parsed.push(node);
        skip_ws_and_comments(&mut rest);
    }

    let mut graph = SceneGraph::new();
    let mut skipped = Vec::new();
    let root = graph.root;
    for node in parsed {
        insert_node_recursive(&mut graph, root, node, registry, &mut skipped);
    }
    Ok(ParseOutcome { graph, skipped })
}

/// 1-based line of the remaining input within the full document.
fn line_of(input: &str, rest: &str) -> usize {
    let consumed = &input[..input.len() - rest.len()];
    consumed.matches('\n').count() + 1
}

/// Internal representation during parsing before inserting into graph.
#[derive(Debug)]
struct ParsedNode {
    tag: String,
    id: Option<NodeId>,
    fields: Vec<(String, FieldValue)>,
    children: Vec<ParsedNode>,
}

fn insert_node_recursive(
    graph: &mut SceneGraph,
    parent: NodeIndex,
    parsed: ParsedNode,
    registry: &KindRegistry,
    skipped: &mut Vec<String>,
) {
    let Some(kind) = registry.create(&parsed.tag) else {
        log::warn!("skipping node with unknown tag `{}`", parsed.tag);
        skipped.push(parsed.tag);
        return;
    };

    let id = match parsed.id {
        Some(id) if graph.index_of(id).is_none() => id,
        other => {
            if let Some(dup) = other {
                log::warn!("duplicate id {dup}; assigning a fresh one");
            }
            NodeId::fresh(kind.tag(), |c| graph.index_of(c).is_some())
        }
    };

    let mut node = SceneNode::new(id, kind);
    for (name, value) in &parsed.fields {
        if !node.apply_field(name, value) {
            log::debug!("ignoring field `{name}` on {id}");
        }
    }

    let idx = graph.add_node(parent, node);
    for child in parsed.children {
        insert_node_recursive(graph, idx, child, registry, skipped);
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn skip_ws_and_comments(input: &mut &str) {
    loop {
        let before = *input;
        *input = input.trim_start();
        if input.starts_with('#') {
            match input.find('\n') {
                Some(pos) => *input = &input[pos + 1..],
                None => *input = "",
            }
            continue;
        }
        if *input == before {
            break;
        }
    }
}

/// Consume optional spaces/tabs (concrete error type avoids inference issues).
fn skip_space(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = space0.parse_next(input);
}

fn skip_to_line_end(input: &mut &str) {
    let _ = take_till::<_, _, ContextError>(0.., |c: char| c == '\n' || c == '}')
        .parse_next(input);
}

fn parse_identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '-').parse_next(input)
}

fn parse_node_id(input: &mut &str) -> ModalResult<NodeId> {
    let _ = '@'.parse_next(input)?;
    parse_identifier.map(NodeId::intern).parse_next(input)
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ =
            take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    let matched = &start[..start.len() - input.len()];
    match matched.parse::<f32>() {
        Ok(n) => Ok(n),
        Err(_) => {
            *input = start;
            backtrack()
        }
    }
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    let _ = '#'.parse_next(input)?;
    let digits: &str = take_while(1..=8, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    match Color::from_hex(digits) {
        Some(c) => Ok(c),
        None => backtrack(),
    }
}

/// A `"…"` string with `\"`, `\\` and `\n` escapes.
fn parse_quoted_string(input: &mut &str) -> ModalResult<String> {
    let _ = '"'.parse_next(input)?;
    let s: &str = *input;
    let mut out = String::new();
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                *input = &s[i + 1..];
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            _ => out.push(c),
        }
    }
    // Unterminated string: the rest of the document is unreadable.
    Err(ErrMode::Cut(ContextError::new()))
}

fn parse_bool(input: &mut &str) -> ModalResult<bool> {
    let word = parse_identifier.parse_next(input)?;
    match word {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => backtrack(),
    }
}

fn parse_value(input: &mut &str) -> ModalResult<FieldValue> {
    if input.starts_with('"') {
        return parse_quoted_string.map(FieldValue::Text).parse_next(input);
    }
    if input.starts_with('#') {
        return parse_hex_color.map(FieldValue::Color).parse_next(input);
    }
    if input.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        let first = parse_number.parse_next(input)?;
        let checkpoint = *input;
        skip_space(input);
        if input.starts_with(|c: char| c == '-' || c.is_ascii_digit())
            && let Ok(second) = parse_number.parse_next(input)
        {
            return Ok(FieldValue::Pair(first, second));
        }
        *input = checkpoint;
        return Ok(FieldValue::Number(first));
    }
    let checkpoint = *input;
    match parse_bool.parse_next(input) {
        Ok(b) => Ok(FieldValue::Bool(b)),
        Err(_) => {
            *input = checkpoint;
            backtrack()
        }
    }
}

// ─── Node parser ─────────────────────────────────────────────────────────

/// Deepest `children { }` nesting accepted in a document.
pub const MAX_NESTING: usize = 256;

fn parse_node(input: &mut &str) -> ModalResult<ParsedNode> {
    parse_nested(input, 0)
}

fn parse_nested(input: &mut &str, depth: usize) -> ModalResult<ParsedNode> {
    if depth > MAX_NESTING {
        log::warn!("nodes nested deeper than {MAX_NESTING}");
        return Err(ErrMode::Cut(ContextError::new()));
    }
    let tag = parse_identifier.parse_next(input)?.to_string();
    skip_space(input);

    let id = if input.starts_with('@') {
        Some(parse_node_id.parse_next(input)?)
    } else {
        None
    };

    skip_space(input);
    let _ = '{'.parse_next(input)?;
    skip_ws_and_comments(input);

    let mut fields = Vec::new();
    let mut children = Vec::new();

    while !input.starts_with('}') {
        let name = parse_identifier.parse_next(input)?;
        skip_space(input);

        if name == "children" && input.starts_with('{') {
            let _ = '{'.parse_next(input)?;
            skip_ws_and_comments(input);
            while !input.starts_with('}') {
                children.push(parse_nested(input, depth + 1)?);
                skip_ws_and_comments(input);
            }
            let _ = '}'.parse_next(input)?;
        } else {
            let _ = ':'.parse_next(input)?;
            skip_space(input);
            let checkpoint = *input;
            match parse_value(input) {
                Ok(value) => fields.push((name.to_string(), value)),
                Err(ErrMode::Cut(e)) => return Err(ErrMode::Cut(e)),
                Err(_) => {
                    *input = checkpoint;
                    log::debug!("unreadable value for field `{name}`");
                    skip_to_line_end(input);
                }
            }
            skip_space(input);
            if input.starts_with(';') {
                *input = &input[1..];
            }
        }
        skip_ws_and_comments(input);
    }

    let _ = '}'.parse_next(input)?;

    Ok(ParsedNode {
        tag,
        id,
        fields,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_nested_nodes() {
        let input = r#"
# flow chart
block @start {
  at: 10 20
  size: 120 60
  label: "Start"
  fill: #FFCC00
  children {
    text @caption {
      at: 8 8
      content: "hello"
      font_size: 18
    }
  }
}
rect @r { at: -5 0.5; size: 3 4 }
"#;
        let sg = parse_document(input).unwrap();
        let start = sg.index_of(NodeId::intern("start")).unwrap();
        let caption = sg.index_of(NodeId::intern("caption")).unwrap();
        let r = sg.index_of(NodeId::intern("r")).unwrap();

        assert_eq!(sg.children(sg.root), &[start, r]);
        assert_eq!(sg.parent(caption), Some(start));
        assert_eq!(sg.world_position(caption), Vec2::new(18.0, 28.0));
        assert_eq!(sg.graph[r].position(), Vec2::new(-5.0, 0.5));
        assert_eq!(
            sg.graph[start].kind,
            NodeKind::Block {
                label: "Start".into()
            }
        );
        assert_eq!(sg.graph[start].style.fill, Color::from_hex("#FFCC00"));
    }

    #[test]
    fn unknown_tags_are_skipped_with_children() {
        let input = r#"
hologram @h {
  at: 1 1
  children {
    rect @inside { size: 5 5 }
  }
}
rect @kept { size: 5 5 }
"#;
        let outcome = parse_document_with(input, &KindRegistry::default()).unwrap();
        assert_eq!(outcome.skipped, vec!["hologram".to_string()]);
        assert!(outcome.graph.index_of(NodeId::intern("kept")).is_some());
        assert!(outcome.graph.index_of(NodeId::intern("inside")).is_none());
    }

    #[test]
    fn unknown_fields_and_bad_values_are_ignored() {
        let input = "rect @odd {\n  sparkle: 3\n  at: what\n  size: 4 4\n}\n";
        let sg = parse_document(input).unwrap();
        let idx = sg.index_of(NodeId::intern("odd")).unwrap();
        assert_eq!(sg.graph[idx].size(), Vec2::new(4.0, 4.0));
        assert_eq!(sg.graph[idx].position(), Vec2::ZERO);
    }

    #[test]
    fn broken_structure_fails() {
        assert!(parse_document("rect @a { size: 1 1").is_err());
        assert!(parse_document("rect @a size: 1 1 }").is_err());
        assert!(parse_document("text @t { content: \"never closed }").is_err());
    }

    fn nested_groups(depth: usize) -> String {
        let mut doc = String::new();
        for i in 0..depth {
            doc.push_str(&format!("group @deep_{i} {{ children {{\n"));
        }
        doc.push_str("rect @deep_leaf { size: 1 1 }\n");
        for _ in 0..depth {
            doc.push_str("} }\n");
        }
        doc
    }

    #[test]
    fn nesting_limit() {
        let sg = parse_document(&nested_groups(MAX_NESTING)).unwrap();
        let leaf = sg.index_of(NodeId::intern("deep_leaf")).unwrap();
        assert_eq!(sg.ancestors(leaf).len(), MAX_NESTING + 2);

        let err = parse_document(&nested_groups(MAX_NESTING + 1)).unwrap_err();
        assert!(err.contains("parse error"));
    }

    #[test]
    fn missing_and_duplicate_ids_get_fresh_ones() {
        let sg = parse_document("rect { }\nrect @same { }\nrect @same { }\n").unwrap();
        assert_eq!(sg.children(sg.root).len(), 3);
        assert_eq!(sg.id_index.len(), 4); // root + 3
    }
}
