//! Commit chain for Pit.
//!
//! A commit captures the whole staging index plus a message and timestamp,
//! and links to the commit before it. Commits are content-addressed: the ID
//! is the digest of the commit's canonical text, so a commit can never change
//! after it is written.
//!
//! # Key Types
//!
//! - [`Commit`] -- The immutable commit record
//! - [`CommitChain`] -- Creates commits, resolves the latest one, walks history

pub mod chain;
pub mod commit;
pub mod error;

pub use chain::CommitChain;
pub use commit::Commit;
pub use error::{ChainError, ChainResult};
