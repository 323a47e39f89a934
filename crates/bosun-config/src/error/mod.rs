//! Domain errors raised by the configuration layer.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! and `clap` errors are boxed to satisfy the `result_large_err` Clippy lint.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from schema assembly, parsing, or config-file handling.
///
/// Every variant is fatal: configuration errors are reported before the host
/// event loop starts and abort the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two option declarations share the same long name.
    #[error("option '--{name}' is declared more than once")]
    DuplicateOption {
        /// The colliding long name.
        name: String,
    },

    /// A config-file line is not a comment, blank, or `key = value` pair.
    #[error("{path}:{line}: malformed config entry '{content}'", path = .path.display())]
    MalformedLine {
        /// Config file that contained the line.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },

    /// A config-file value does not fit the declared option shape.
    #[error("option '{name}' has invalid value '{value}'")]
    InvalidValue {
        /// Option long name.
        name: String,
        /// The rejected value text.
        value: String,
    },

    /// The command line failed to parse against the merged schema.
    #[error("invalid command line: {0}")]
    Cli(#[source] Box<clap::Error>),

    /// An I/O error occurred while reading or writing a config file.
    #[error("config I/O error on {path}: {source}", path = .path.display())]
    Io {
        /// File or directory the operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        source: Arc<io::Error>,
    },
}

impl ConfigError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}
