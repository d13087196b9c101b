use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Inkdex operations
#[derive(Error, Debug)]
pub enum InkdexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to scan document {path}: {source}")]
    DocumentScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Term store error: {0}")]
    Store(String),
}

/// Result type alias for Inkdex operations
pub type Result<T> = std::result::Result<T, InkdexError>;

impl InkdexError {
    /// Wrap an I/O failure that happened while reading a particular document
    pub fn document_scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InkdexError::DocumentScan {
            path: path.into(),
            source,
        }
    }

    /// Errors of this kind only exclude one document from a build; they never
    /// abort the build itself.
    pub fn is_document_scoped(&self) -> bool {
        matches!(self, InkdexError::DocumentScan { .. })
    }
}
