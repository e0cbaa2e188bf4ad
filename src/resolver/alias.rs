use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;

use super::files::normalize_path;

/// One alias mapping from a specifier prefix to a target directory.
#[derive(Debug, Clone)]
pub struct AliasEntry {
    /// The alias prefix with any trailing `/` or `/*` stripped, e.g. `@utils`.
    pub prefix: String,
    /// The substitution directory, resolved to an absolute path.
    pub target: PathBuf,
}

/// Lookup table from alias prefixes to target directories.
///
/// Entries are ordered longest prefix first so overlapping aliases
/// (`@app` and `@app/models`) resolve to the most specific match.
/// Built once per converter and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    /// Build a table from the raw `compilerOptions.paths` mapping.
    ///
    /// Each pattern must map to exactly one substitution; anything else is a
    /// configuration error naming the offending key. Trailing `/` or `/*` is
    /// stripped from both sides and the substitution is resolved against
    /// `base_dir`.
    pub fn build(
        paths: &BTreeMap<String, Vec<String>>,
        base_dir: &Path,
    ) -> Result<Self, ConvertError> {
        let mut entries = Vec::new();
        for (pattern, targets) in paths {
            if targets.len() != 1 {
                return Err(ConvertError::BadPathMapping {
                    key: pattern.clone(),
                    count: targets.len(),
                });
            }
            let prefix = strip_wildcard(pattern).to_string();
            let target = normalize_path(&base_dir.join(strip_wildcard(&targets[0])));
            entries.push(AliasEntry { prefix, target });
        }

        // Longest prefix first; ties break lexicographically for determinism
        entries.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });

        Ok(AliasTable { entries })
    }

    /// Find the alias whose prefix matches the leading path segments of
    /// `specifier`. Returns the matched prefix and its target directory.
    ///
    /// Prefixes match whole segments only: `@app` matches `@app` and
    /// `@app/x`, never `@apples/x`. No match is not an error; unmatched
    /// `@`-specifiers may be scoped package names and pass through.
    pub fn resolve(&self, specifier: &str) -> Option<(&str, &Path)> {
        self.entries.iter().find_map(|entry| {
            let rest = specifier.strip_prefix(entry.prefix.as_str())?;
            if rest.is_empty() || rest.starts_with('/') {
                Some((entry.prefix.as_str(), entry.target.as_path()))
            } else {
                None
            }
        })
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strip a trailing `/` or `/*` from an alias pattern or substitution.
fn strip_wildcard(pattern: &str) -> &str {
    pattern
        .strip_suffix("/*")
        .or_else(|| pattern.strip_suffix('/'))
        .unwrap_or(pattern)
}
