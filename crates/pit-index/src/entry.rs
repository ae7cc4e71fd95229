//! Index entry types for staged files.

use std::collections::BTreeMap;

use pit_types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};

/// An entry in the staging index, representing one staged file.
///
/// The path is the key of the enclosing [`IndexSnapshot`], not a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Content-addressed ID of the file's blob in the object store.
    pub hash: ObjectId,
    /// Modification time of the source file when it was staged.
    pub timestamp: Timestamp,
}

impl IndexEntry {
    /// Create a new index entry.
    pub fn new(hash: ObjectId, timestamp: Timestamp) -> Self {
        Self { hash, timestamp }
    }
}

/// The full staging index: path to entry, sorted by path.
///
/// Sorted keys keep the serialized form deterministic, which matters because
/// commits embed a copy of this mapping and are hashed.
pub type IndexSnapshot = BTreeMap<String, IndexEntry>;
