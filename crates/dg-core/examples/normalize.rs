//! Rewrite `.dg` files in canonical form: parse, then emit.
//!
//! Nodes with unknown tags are dropped by the parser, so files that contain
//! any are left untouched unless `--force` is passed.
//!
//!     cargo run -p dg-core --example normalize -- [--force] <file.dg>...

use dg_core::emitter::emit_document;
use dg_core::parser::parse_document_with;
use dg_core::registry::KindRegistry;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

enum Outcome {
    Rewritten,
    Unchanged,
    Kept(String),
}

fn normalize(path: &Path, registry: &KindRegistry, force: bool) -> Result<Outcome, String> {
    let input = fs::read_to_string(path).map_err(|e| format!("read: {e}"))?;
    let parsed = parse_document_with(&input, registry)?;

    if !parsed.skipped.is_empty() && !force {
        return Ok(Outcome::Kept(format!(
            "unknown tags {}",
            parsed.skipped.join(", ")
        )));
    }

    let output = emit_document(&parsed.graph);
    if output == input {
        return Ok(Outcome::Unchanged);
    }
    fs::write(path, &output).map_err(|e| format!("write: {e}"))?;
    Ok(Outcome::Rewritten)
}

fn main() {
    env_logger::init();

    let mut force = false;
    let mut paths: Vec<PathBuf> = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--force" {
            force = true;
        } else {
            paths.push(PathBuf::from(arg));
        }
    }
    if paths.is_empty() {
        eprintln!("usage: normalize [--force] <file.dg>...");
        std::process::exit(2);
    }

    let registry = KindRegistry::default();
    let mut rewritten = 0;
    let mut failed = 0;

    for path in &paths {
        match normalize(path, &registry, force) {
            Ok(Outcome::Rewritten) => {
                rewritten += 1;
                println!("✓ {}", path.display());
            }
            Ok(Outcome::Unchanged) => {}
            Ok(Outcome::Kept(reason)) => println!("SKIP {}: {reason}", path.display()),
            Err(e) => {
                failed += 1;
                eprintln!("ERROR {}: {e}", path.display());
            }
        }
    }

    println!("\nRewritten: {rewritten}, Failed: {failed}");
    if failed > 0 {
        std::process::exit(1);
    }
}
