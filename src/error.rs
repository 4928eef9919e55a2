//! Error types for docsort
//!
//! Only two kinds of failure escape a run: oracle transport errors (fatal,
//! no safe fallback exists) and setup problems found before any file is
//! touched. Per-file filesystem errors are recorded in the report instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ai::OracleError;

/// Main error type for the archive pipeline
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Filesystem errors, tagged with the path involved
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Classification or rewrite call failed outright
    #[error("Oracle failure: {0}")]
    Oracle(#[from] OracleError),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report serialization errors
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ArchiveError {
    /// Build an `Io` variant from a path and the underlying error
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error must stop the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, ArchiveError::Oracle(_) | ArchiveError::Config(_))
    }
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, ArchiveError>;
