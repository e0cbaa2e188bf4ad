use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building a converter or converting a file.
///
/// Resolution misses are deliberately absent: a specifier whose target
/// cannot be confirmed on disk is logged and passed through best-effort,
/// never raised.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A `paths` entry in the compiler options had an unusable substitution list.
    #[error("path mapping \"{key}\" must have exactly one substitution, found {count}")]
    BadPathMapping { key: String, count: usize },

    /// The compiler options file could not be read or parsed.
    #[error("failed to load {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// A dynamic import whose argument list cannot be rewritten.
    #[error(
        "{}:{line}:{column}: dynamic import takes exactly one argument, found {count}",
        .file.display()
    )]
    DynamicImportArity {
        file: PathBuf,
        line: usize,
        column: usize,
        count: usize,
    },

    /// The parser produced no syntax tree for the file.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Streamed contents handed to the pipeline step; only buffered text is supported.
    #[error("streamed contents are not supported: {}", .path.display())]
    StreamedContents { path: PathBuf },

    /// The file could not be read.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
