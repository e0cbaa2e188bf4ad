use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::convert::Converter;
use crate::discovery::{discover_files, DiscoveryConfig};
use crate::model::TargetExtension;
use crate::resolver::alias::AliasEntry;
use crate::resolver::tsconfig::ResolvedConfig;

use super::config::ToolConfig;

/// Result of a batch conversion run.
#[derive(Debug, Serialize)]
pub struct ConvertOutcome {
    pub files_converted: usize,
    pub files_failed: usize,
    pub errors: Vec<String>,
    pub duration_ms: u128,
    /// Rewritten text when `--stdout` was requested for a single file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

/// Run the convert command over a directory or a single file.
///
/// Files fail independently: one unrewritable file lands in `errors` while
/// the rest of the batch still converts.
pub fn run_convert(
    path: &str,
    out: Option<&str>,
    stdout: bool,
    project: Option<&str>,
    ext: Option<TargetExtension>,
    include: &[String],
    exclude: &[String],
) -> Result<ConvertOutcome> {
    let start = Instant::now();

    let input = PathBuf::from(path)
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from(path));
    let root = if input.is_file() {
        input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        input.clone()
    };

    let tool_config = ToolConfig::load(&root)?;
    let ext = ext.or(tool_config.ext).unwrap_or_default();
    // Relative output directories resolve against the project root.
    let out_dir: Option<PathBuf> = out
        .map(str::to_string)
        .or_else(|| tool_config.out.clone())
        .map(|p| {
            let p = PathBuf::from(p);
            if p.is_absolute() {
                p
            } else {
                root.join(p)
            }
        });

    let converter = build_converter(&root, project, &tool_config, ext)?;

    if input.is_file() {
        let result = converter.convert(&input, None);
        return match result {
            Ok(text) => {
                let rendered = if stdout {
                    Some(text)
                } else {
                    let dest = output_path(&input, &root, out_dir.as_deref(), ext);
                    write_output(&dest, &text)?;
                    None
                };
                Ok(ConvertOutcome {
                    files_converted: 1,
                    files_failed: 0,
                    errors: Vec::new(),
                    duration_ms: start.elapsed().as_millis(),
                    rendered,
                })
            }
            Err(e) => Ok(ConvertOutcome {
                files_converted: 0,
                files_failed: 1,
                errors: vec![e.to_string()],
                duration_ms: start.elapsed().as_millis(),
                rendered: None,
            }),
        };
    }

    if stdout {
        bail!("--stdout requires a single file, got a directory: {}", input.display());
    }

    let discovery = DiscoveryConfig {
        include: merge_patterns(include, &tool_config.include),
        exclude: merge_patterns(exclude, &tool_config.exclude),
    };
    let discovered = discover_files(&input, &discovery)?;

    // Convert in parallel; the converter is immutable and shared by reference.
    let results: Vec<(PathBuf, Result<String, crate::error::ConvertError>)> = discovered
        .par_iter()
        .map(|df| (df.path.clone(), converter.convert(&df.path, None)))
        .collect();

    let mut files_converted = 0;
    let mut errors = Vec::new();
    for (source, result) in results {
        match result {
            Ok(text) => {
                let dest = output_path(&source, &input, out_dir.as_deref(), ext);
                write_output(&dest, &text)?;
                files_converted += 1;
            }
            Err(e) => errors.push(e.to_string()),
        }
    }

    Ok(ConvertOutcome {
        files_converted,
        files_failed: errors.len(),
        errors,
        duration_ms: start.elapsed().as_millis(),
        rendered: None,
    })
}

/// Resolve the alias table for a project and return its entries.
pub fn run_aliases(path: &str, project: Option<&str>) -> Result<Vec<AliasEntry>> {
    let root = PathBuf::from(path)
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from(path));
    let tool_config = ToolConfig::load(&root)?;
    let converter = build_converter(&root, project, &tool_config, TargetExtension::default())?;
    Ok(converter.aliases().entries().to_vec())
}

/// Build a converter from the first tsconfig that applies: the --project
/// flag, the tool config, or the nearest tsconfig.json at or above the
/// root. Without any of those the converter still rewrites relative
/// imports, just without aliases.
fn build_converter(
    root: &Path,
    project: Option<&str>,
    tool_config: &ToolConfig,
    ext: TargetExtension,
) -> Result<Converter> {
    let tsconfig_path = project
        .map(str::to_string)
        .or_else(|| tool_config.project.clone())
        .map(|p| {
            let p = PathBuf::from(p);
            if p.is_absolute() {
                p
            } else {
                root.join(p)
            }
        })
        .or_else(|| {
            // Search upward so converting a single file deep in the tree
            // still picks up the project's tsconfig.json.
            root.ancestors()
                .map(|dir| dir.join("tsconfig.json"))
                .find(|p| p.exists())
        });

    let converter = match tsconfig_path {
        Some(path) => Converter::from_config_file(&path, ext)
            .with_context(|| format!("failed to build converter from {}", path.display()))?,
        None => {
            tracing::debug!(root = %root.display(), "no tsconfig found, converting without aliases");
            let config = ResolvedConfig {
                config_dir: root.to_path_buf(),
                ..Default::default()
            };
            Converter::new(config, ext)?
        }
    };
    Ok(converter)
}

/// Where a converted file is written: next to the source with the target
/// extension, or under the output directory preserving the source layout.
fn output_path(
    source: &Path,
    root: &Path,
    out_dir: Option<&Path>,
    ext: TargetExtension,
) -> PathBuf {
    let renamed = source.with_extension(ext.extension());
    match out_dir {
        None => renamed,
        Some(out_dir) => {
            let relative = renamed.strip_prefix(root).unwrap_or(&renamed);
            out_dir.join(relative)
        }
    }
}

fn write_output(dest: &Path, text: &str) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(dest, text).with_context(|| format!("failed to write {}", dest.display()))
}

fn merge_patterns(flags: &[String], config: &[String]) -> Vec<String> {
    if flags.is_empty() {
        config.to_vec()
    } else {
        flags.to_vec()
    }
}
