use std::path::PathBuf;

use pit_chain::ChainError;
use pit_index::IndexError;
use pit_store::StoreError;
use thiserror::Error;

/// Errors surfaced to SDK callers.
///
/// The recoverable kinds callers are expected to branch on are lifted out of
/// the component errors into their own variants; everything else is wrapped.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a pit repository (or not initialized): {}", .0.display())]
    NotInitialized(PathBuf),

    #[error("file {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("nothing to commit")]
    NothingToCommit,

    #[error("commit message is empty")]
    EmptyMessage,

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("index error: {0}")]
    Index(IndexError),

    #[error("commit chain error: {0}")]
    Chain(ChainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for SdkError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => Self::ObjectNotFound(id.to_hex()),
            StoreError::CorruptObject { id, reason } => Self::CorruptObject {
                id: id.to_hex(),
                reason,
            },
            other => Self::Store(other),
        }
    }
}

impl From<IndexError> for SdkError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::FileNotFound(path) => Self::FileNotFound(path),
            IndexError::InvalidPath(reason) => Self::InvalidPath(reason),
            IndexError::Store(inner) => inner.into(),
            other => Self::Index(other),
        }
    }
}

impl From<ChainError> for SdkError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::NothingToCommit => Self::NothingToCommit,
            ChainError::EmptyMessage => Self::EmptyMessage,
            ChainError::CommitNotFound(id) => Self::ObjectNotFound(id.to_hex()),
            ChainError::Store(inner) => inner.into(),
            other => Self::Chain(other),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
