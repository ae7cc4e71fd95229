//! High-level SDK for Pit.
//!
//! [`Pit`] is the entry point: it ties a repository root and its
//! configuration to the object store, staging index and commit chain.
//!
//! ```no_run
//! use pit_sdk::Pit;
//!
//! let pit = Pit::init(".")?;
//! pit.stage("a.txt")?;
//! let id = pit.commit("add a")?;
//! println!("{}", pit.show(&id)?.message);
//! # Ok::<(), pit_sdk::SdkError>(())
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod repository;
pub mod summary;

pub use config::{CommitConfig, CoreConfig, RepoConfig};
pub use error::{SdkError, SdkResult};
pub use layout::{RepoLayout, VCS_DIR};
pub use repository::Pit;
pub use summary::CommitSummary;

// Re-export key types
pub use pit_chain::Commit;
pub use pit_index::{IndexEntry, IndexSnapshot};
pub use pit_types::{ObjectId, Timestamp};
