//! Error types for the index crate.

use std::path::PathBuf;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The file to stage does not exist.
    #[error("file {} not found", .0.display())]
    FileNotFound(PathBuf),

    /// The specified path was not found in the index.
    #[error("path not found in index: {0}")]
    PathNotFound(String),

    /// An invalid path was provided.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The index file exists but does not hold a valid mapping.
    #[error("corrupt index file: {0}")]
    CorruptIndex(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] pit_store::StoreError),

    /// I/O error reading or writing the index file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
