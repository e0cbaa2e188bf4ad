use std::path::Path;

use tree_sitter::{Node, Parser};

use crate::error::ConvertError;

pub mod rewrite;

use rewrite::{rewrite_specifier, RewriteContext};

/// A pending replacement of a byte range in the source text.
#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// Parse `source` and rewrite every import/export/dynamic-import specifier.
///
/// Only the specifier spans change; all other text, comments and formatting
/// included, is emitted byte for byte.
pub fn transform_source(source: &str, ctx: &RewriteContext) -> Result<String, ConvertError> {
    let mut parser = create_parser(&ctx.file)?;
    let tree = parser.parse(source, None).ok_or_else(|| ConvertError::Parse {
        path: ctx.file.clone(),
        message: "parser produced no tree".to_string(),
    })?;

    let mut edits = Vec::new();
    collect_edits(tree.root_node(), source, ctx, false, &mut edits)?;
    Ok(apply_edits(source, edits))
}

/// Pick the grammar from the file extension. Anything that is not
/// TypeScript parses with the JavaScript grammar.
fn create_parser(path: &Path) -> Result<Parser, ConvertError> {
    let language: tree_sitter::Language = match path.extension().and_then(|e| e.to_str()) {
        Some("tsx") => tree_sitter_typescript::LANGUAGE_TSX.into(),
        Some("ts" | "mts" | "cts") => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        _ => tree_sitter_javascript::LANGUAGE.into(),
    };
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ConvertError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(parser)
}

/// Walk the tree collecting specifier replacements.
///
/// `all_strings` is set while inside the non-literal argument of a dynamic
/// import: every string literal found there is a rewrite candidate.
fn collect_edits(
    node: Node,
    source: &str,
    ctx: &RewriteContext,
    all_strings: bool,
    edits: &mut Vec<Edit>,
) -> Result<(), ConvertError> {
    match node.kind() {
        "import_statement" => {
            // Type-only imports have no runtime module to resolve.
            if !is_type_only(node) {
                if let Some(spec) = node.child_by_field_name("source") {
                    push_rewrite(spec, source, ctx, edits);
                }
            }
            Ok(())
        }
        "export_statement" => {
            match node.child_by_field_name("source") {
                Some(spec) => {
                    if !is_type_only(node) {
                        push_rewrite(spec, source, ctx, edits);
                    }
                    Ok(())
                }
                // `export { x }` or an exported declaration: nothing to
                // rewrite here, but the declaration may contain dynamic
                // imports.
                None => recurse(node, source, ctx, all_strings, edits),
            }
        }
        "call_expression" if is_dynamic_import(node) => {
            rewrite_dynamic_import(node, source, ctx, edits)
        }
        "string" if all_strings => {
            push_rewrite(node, source, ctx, edits);
            Ok(())
        }
        _ => recurse(node, source, ctx, all_strings, edits),
    }
}

fn recurse(
    node: Node,
    source: &str,
    ctx: &RewriteContext,
    all_strings: bool,
    edits: &mut Vec<Edit>,
) -> Result<(), ConvertError> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_edits(child, source, ctx, all_strings, edits)?;
    }
    Ok(())
}

/// `import type { T } from "..."` / `export type { T } from "..."` mark the
/// whole statement with a direct `type` child.
fn is_type_only(node: Node) -> bool {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(|c| c.kind() == "type");
    result
}

/// Dynamic imports parse as a call whose callee is the `import` keyword.
fn is_dynamic_import(node: Node) -> bool {
    node.child_by_field_name("function")
        .is_some_and(|f| f.kind() == "import")
}

fn rewrite_dynamic_import(
    node: Node,
    source: &str,
    ctx: &RewriteContext,
    edits: &mut Vec<Edit>,
) -> Result<(), ConvertError> {
    let args: Vec<Node> = match node.child_by_field_name("arguments") {
        Some(list) => {
            let mut cursor = list.walk();
            list.named_children(&mut cursor)
                .filter(|c| c.kind() != "comment")
                .collect()
        }
        None => Vec::new(),
    };

    if args.len() != 1 {
        let pos = node.start_position();
        return Err(ConvertError::DynamicImportArity {
            file: ctx.file.clone(),
            line: pos.row + 1,
            column: pos.column + 1,
            count: args.len(),
        });
    }

    let arg = args[0];
    if arg.kind() == "string" {
        push_rewrite(arg, source, ctx, edits);
        Ok(())
    } else {
        // Specifiers assembled from expressions: rewrite the literal pieces,
        // leave the computed parts alone.
        collect_edits(arg, source, ctx, true, edits)
    }
}

fn push_rewrite(spec: Node, source: &str, ctx: &RewriteContext, edits: &mut Vec<Edit>) {
    let raw = &source[spec.byte_range()];
    let rewritten = rewrite_specifier(raw, ctx);
    if rewritten != raw {
        edits.push(Edit {
            start: spec.start_byte(),
            end: spec.end_byte(),
            text: rewritten,
        });
    }
}

/// Splice edits into the source. Spans never overlap, so a single
/// front-to-back pass with a cursor suffices.
fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| e.start);
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    for edit in &edits {
        out.push_str(&source[pos..edit.start]);
        out.push_str(&edit.text);
        pos = edit.end;
    }
    out.push_str(&source[pos..]);
    out
}
