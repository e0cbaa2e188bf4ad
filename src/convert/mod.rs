use std::path::Path;

use crate::error::ConvertError;
use crate::model::{is_source_extension, FileContents, FileItem, TargetExtension};
use crate::resolver::alias::AliasTable;
use crate::resolver::tsconfig::ResolvedConfig;
use crate::transform::rewrite::RewriteContext;
use crate::transform::transform_source;

/// Façade owning the parsed configuration and alias table for a project.
///
/// Construction resolves every alias once; afterwards the converter is
/// immutable, so any number of files may be converted concurrently through
/// a shared reference without coordination.
#[derive(Debug)]
pub struct Converter {
    config: ResolvedConfig,
    aliases: AliasTable,
    default_ext: TargetExtension,
}

impl Converter {
    /// Build a converter from already-parsed compiler options.
    pub fn new(config: ResolvedConfig, default_ext: TargetExtension) -> Result<Self, ConvertError> {
        let aliases = AliasTable::build(&config.paths, config.resolution_base())?;
        tracing::debug!(
            aliases = aliases.len(),
            target = config.target.as_deref().unwrap_or("latest"),
            "converter ready"
        );
        Ok(Converter {
            config,
            aliases,
            default_ext,
        })
    }

    /// Build a converter by loading a tsconfig.json file.
    pub fn from_config_file(
        path: &Path,
        default_ext: TargetExtension,
    ) -> Result<Self, ConvertError> {
        Self::new(ResolvedConfig::load(path)?, default_ext)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn default_extension(&self) -> TargetExtension {
        self.default_ext
    }

    /// Convert one file's text, reading it from disk when `contents` is None.
    ///
    /// Pure apart from filesystem probes and that optional read; never
    /// writes anything.
    pub fn convert(&self, file: &Path, contents: Option<&str>) -> Result<String, ConvertError> {
        self.convert_with_ext(file, contents, self.default_ext)
    }

    /// Convert with an explicit target extension for this call.
    pub fn convert_with_ext(
        &self,
        file: &Path,
        contents: Option<&str>,
        ext: TargetExtension,
    ) -> Result<String, ConvertError> {
        let owned;
        let text = match contents {
            Some(text) => text,
            None => {
                owned = std::fs::read_to_string(file).map_err(|e| ConvertError::Io {
                    path: file.to_path_buf(),
                    source: e,
                })?;
                &owned
            }
        };
        let ctx = RewriteContext::new(file, &self.aliases, ext);
        transform_source(text, &ctx)
    }

    /// Adapt `convert` into a per-item step for a file pipeline.
    pub fn pipeline_step(&self, ext: Option<TargetExtension>) -> PipelineStep<'_> {
        PipelineStep {
            converter: self,
            ext: ext.unwrap_or(self.default_ext),
        }
    }
}

/// Per-item transform for streaming pipelines.
///
/// Items that are not TypeScript sources pass through untouched. Streamed
/// contents are rejected per item so the rest of the pipeline keeps going;
/// the error travels on the item's own result, never across the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineStep<'a> {
    converter: &'a Converter,
    ext: TargetExtension,
}

impl PipelineStep<'_> {
    pub fn apply(&self, item: FileItem) -> Result<FileItem, ConvertError> {
        let is_source = item
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(is_source_extension);
        if !is_source {
            return Ok(item);
        }

        match item.contents {
            FileContents::Streamed => Err(ConvertError::StreamedContents { path: item.path }),
            FileContents::Buffered(text) => {
                let converted = self
                    .converter
                    .convert_with_ext(&item.path, Some(&text), self.ext)?;
                Ok(FileItem {
                    path: item.path,
                    contents: FileContents::Buffered(converted),
                })
            }
        }
    }
}
