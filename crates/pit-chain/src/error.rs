use pit_types::ObjectId;

/// Errors from commit chain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The staging index is empty, or identical to the latest commit.
    #[error("nothing to commit")]
    NothingToCommit,

    /// Commit messages must contain non-whitespace text.
    #[error("commit message is empty")]
    EmptyMessage,

    /// No commit record exists for the ID.
    #[error("commit not found: {0}")]
    CommitNotFound(ObjectId),

    /// A commit record could not be decoded or does not match its ID.
    #[error("corrupt commit {id}: {reason}")]
    CorruptCommit { id: ObjectId, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(#[from] pit_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] pit_refs::RefError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
