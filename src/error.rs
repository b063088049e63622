//! Error types for the renamer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the renamer.
#[derive(Error, Debug)]
pub enum Error {
    // Operation errors
    #[error("Source file does not exist: {0}")]
    SourceMissing(PathBuf),

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy failed {from} -> {to}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy verification failed for {path}: expected {expected} bytes, found {actual}")]
    CopyVerificationFailed {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Copied successfully but failed to remove source {path} (remove it manually): {source}")]
    SourceRemovalFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown operation kind: {0}")]
    UnknownOperationKind(String),

    // Input errors
    #[error("Invalid path mapping '{0}'. Use: old:new")]
    InvalidPathMapping(String),

    #[error("Unsupported shell '{0}' (use cmd, powershell or bash)")]
    UnsupportedShell(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    // Configuration errors
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // Metadata store errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
