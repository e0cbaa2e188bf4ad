use std::path::{Path, PathBuf};

use crate::model::TargetExtension;
use crate::resolver::alias::AliasTable;
use crate::resolver::files::{forward_slashes, normalize_path, relative_path, resolve_file};

/// Per-file state needed to rewrite specifiers.
///
/// Created at the start of a conversion call and dropped at the end. The
/// alias table is shared, immutable, across every file of a converter.
#[derive(Debug)]
pub struct RewriteContext<'a> {
    /// Absolute path of the file being converted.
    pub file: PathBuf,
    /// Directory of `file`; relative specifiers resolve against this.
    pub dir: PathBuf,
    /// Alias prefix lookup for the whole project.
    pub aliases: &'a AliasTable,
    /// Extension rewritten specifiers should carry.
    pub ext: TargetExtension,
}

impl<'a> RewriteContext<'a> {
    pub fn new(file: &Path, aliases: &'a AliasTable, ext: TargetExtension) -> Self {
        let dir = file.parent().unwrap_or(Path::new(".")).to_path_buf();
        RewriteContext {
            file: file.to_path_buf(),
            dir,
            aliases,
            ext,
        }
    }
}

/// Rewrite one quoted specifier exactly as it appeared in source.
///
/// Bare specifiers and `@`-specifiers matching no alias come back unchanged.
/// Everything else becomes a normalized relative path with the target
/// extension, quoted with the original quote character.
pub fn rewrite_specifier(raw: &str, ctx: &RewriteContext) -> String {
    let (quote, specifier) = strip_quotes(raw);
    let Some(first) = specifier.chars().next() else {
        return raw.to_string();
    };

    let absolute = match first {
        '@' => match ctx.aliases.resolve(specifier) {
            Some((prefix, target)) => {
                let rest = &specifier[prefix.len()..];
                if rest.is_empty() {
                    target.to_path_buf()
                } else {
                    normalize_path(&target.join(&rest[1..]))
                }
            }
            // May be a scoped package name; leave the whole specifier alone.
            None => return raw.to_string(),
        },
        '.' => normalize_path(&ctx.dir.join(specifier)),
        _ => return raw.to_string(),
    };

    let resolved = resolve_file(&absolute, ctx.ext);
    let relative = relative_path(&ctx.dir, &resolved);
    let mut text = forward_slashes(&relative);
    if text.starts_with('/') {
        text.insert(0, '.');
    } else if !text.starts_with('.') {
        text.insert_str(0, "./");
    }
    format!("{quote}{text}{quote}")
}

/// Split the surrounding quote character off a string-literal's source text.
fn strip_quotes(raw: &str) -> (char, &str) {
    let mut chars = raw.chars();
    match chars.next() {
        Some(q @ ('"' | '\'')) if raw.len() >= 2 && raw.ends_with(q) => {
            (q, &raw[1..raw.len() - 1])
        }
        _ => ('"', raw),
    }
}
