//! Error types for reference operations.

use pit_types::ObjectId;
use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// Another writer holds the HEAD lock.
    #[error("HEAD is locked by another writer ({lock})")]
    HeadLocked { lock: String },

    /// HEAD changed between reading it and updating it.
    #[error("HEAD moved: expected {expected}, found {actual}")]
    HeadMoved { expected: String, actual: String },

    /// The HEAD file does not contain a valid object ID.
    #[error("invalid HEAD contents: {0}")]
    InvalidHead(String),

    /// I/O error during file-based ref operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefError {
    pub(crate) fn moved(expected: Option<ObjectId>, actual: Option<ObjectId>) -> Self {
        let show = |id: Option<ObjectId>| id.map_or_else(|| "(none)".to_string(), |id| id.to_hex());
        Self::HeadMoved {
            expected: show(expected),
            actual: show(actual),
        }
    }
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
