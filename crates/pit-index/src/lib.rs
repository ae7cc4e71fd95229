//! Staging index for Pit.
//!
//! Tracks which file contents will make up the next commit. The index is a
//! flat mapping from file path to the object ID of the staged content plus
//! the file's modification time, persisted as JSON.
//!
//! # Key Types
//!
//! - [`StagingIndex`] -- Handle over the persisted index file
//! - [`IndexEntry`] -- One staged file: object ID and timestamp
//! - [`IndexSnapshot`] -- The whole mapping, sorted by path

pub mod entry;
pub mod error;
pub mod index;

pub use entry::{IndexEntry, IndexSnapshot};
pub use error::{IndexError, IndexResult};
pub use index::StagingIndex;
