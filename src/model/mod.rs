use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// File extension rewritten specifiers carry in emitted output.
///
/// Reflects the output module format, not the source file's own suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetExtension {
    /// Plain `.js` output.
    #[default]
    Js,
    /// ES module `.mjs` output.
    Mjs,
    /// CommonJS `.cjs` output.
    Cjs,
}

impl TargetExtension {
    /// The suffix including the leading dot, e.g. `".mjs"`.
    pub fn suffix(self) -> &'static str {
        match self {
            TargetExtension::Js => ".js",
            TargetExtension::Mjs => ".mjs",
            TargetExtension::Cjs => ".cjs",
        }
    }

    /// The extension without the dot, for `Path::set_extension`.
    pub fn extension(self) -> &'static str {
        &self.suffix()[1..]
    }

    /// Index file name used when a specifier points at a directory.
    pub fn index_file(self) -> &'static str {
        match self {
            TargetExtension::Js => "index.js",
            TargetExtension::Mjs => "index.mjs",
            TargetExtension::Cjs => "index.cjs",
        }
    }
}

impl fmt::Display for TargetExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Extensions of files the converter transforms. Everything else passes
/// through a pipeline untouched.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx"];

pub fn is_source_extension(ext: &str) -> bool {
    SOURCE_EXTENSIONS.contains(&ext)
}

/// One item flowing through a conversion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub path: PathBuf,
    pub contents: FileContents,
}

/// Contents of a pipeline item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    /// Fully buffered text, ready to transform.
    Buffered(String),
    /// Contents backed by a stream the converter cannot buffer. Rejected
    /// per item.
    Streamed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_and_extension() {
        assert_eq!(TargetExtension::Js.suffix(), ".js");
        assert_eq!(TargetExtension::Mjs.extension(), "mjs");
        assert_eq!(TargetExtension::Cjs.index_file(), "index.cjs");
    }

    #[test]
    fn test_source_extensions() {
        assert!(is_source_extension("ts"));
        assert!(is_source_extension("tsx"));
        assert!(!is_source_extension("css"));
        assert!(!is_source_extension("js"));
    }
}
