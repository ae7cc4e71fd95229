//! Reference management for Pit.
//!
//! Pit has a single reference: HEAD, the ID of the most recent commit. It is
//! the authoritative answer to "which commit is latest" and is moved forward
//! by every successful commit under a lock file.
//!
//! # Modules
//!
//! - [`error`] — Error types for ref operations
//! - [`head`] — The file-backed [`HeadRef`]

pub mod error;
pub mod head;

pub use error::{RefError, Result};
pub use head::HeadRef;
