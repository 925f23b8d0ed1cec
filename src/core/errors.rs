//! Shared error types for the analyzer

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for godmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// The analysis root does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// A file could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be parsed at all
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Clustering failed for a god class
    #[error("Clustering error: {0}")]
    Clustering(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run was cancelled by the caller
    #[error("Analysis cancelled")]
    Cancelled,

    /// Wrapped external errors
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error for a file
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error is scoped to a single file and should be recorded
    /// on its outcome rather than aborting the run.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Error::Io { .. } | Error::Parse { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
