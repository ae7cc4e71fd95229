//! Content-addressed object storage for Pit.
//!
//! Analogous to git's `.git/objects/` directory: every piece of data Pit
//! persists (staged file contents, commit records) is stored as an immutable
//! object identified by the digest of its content.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- one zstd-compressed file per object
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Storing the same content twice is a no-op returning the same ID.
//! 3. Reads verify the content against its ID.
//! 4. The store never interprets object contents.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::{FsObjectStore, DEFAULT_COMPRESSION_LEVEL};
pub use memory::InMemoryObjectStore;
pub use traits::ObjectStore;

use pit_types::ObjectId;

/// Digest of text content, as used for its object ID.
pub fn hash(content: &str) -> ObjectId {
    ObjectId::from_content(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_stored_id() {
        let store = InMemoryObjectStore::new();
        let id = store.store("hello").unwrap();
        assert_eq!(hash("hello"), id);
        assert_eq!(store.hash(b"hello"), id);
        assert_ne!(hash("hello"), hash("hello\n"));
    }
}
