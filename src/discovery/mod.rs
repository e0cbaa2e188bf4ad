use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

use crate::model::is_source_extension;

/// A discovered source file eligible for conversion.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
}

/// Configuration for file discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Glob patterns to include (empty means include all).
    pub include: Vec<String>,
    /// Glob patterns to exclude.
    pub exclude: Vec<String>,
}

/// Directories that never contain convertible sources.
const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["node_modules/", "dist/"];

/// Discover TypeScript source files in a project directory, respecting
/// .gitignore. Declaration files (`.d.ts`) are skipped; they carry no
/// runtime imports to rewrite.
pub fn discover_files(root: &Path, config: &DiscoveryConfig) -> Result<Vec<DiscoveredFile>> {
    let mut files = Vec::new();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false) // don't skip dot-prefixed dirs entirely (let gitignore decide)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .parents(true);

    // Add exclude patterns as ignore overrides (defaults + user config)
    {
        let mut overrides = ignore::overrides::OverrideBuilder::new(root);
        for pattern in DEFAULT_EXCLUDE_PATTERNS {
            overrides
                .add(&format!("!{}", pattern))
                .context("invalid default exclude pattern")?;
        }
        for pattern in &config.exclude {
            overrides
                .add(&format!("!{}", pattern))
                .context("invalid exclude pattern")?;
        }
        for pattern in &config.include {
            overrides.add(pattern).context("invalid include pattern")?;
        }
        builder.overrides(overrides.build().context("failed to build overrides")?);
    }

    for entry in builder.build() {
        let entry = entry.context("error reading directory entry")?;

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();

        let is_source = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(is_source_extension);
        if !is_source {
            continue;
        }

        if path.to_string_lossy().ends_with(".d.ts") {
            continue;
        }

        files.push(DiscoveredFile {
            path: path.to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
