use pit_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - The ID of an object is a pure function of its content bytes.
/// - Objects are immutable once written; writing the same content again is a
///   no-op that returns the same ID.
/// - `read` returns exactly the bytes that were written, verified against the
///   ID, or an error. Corruption is never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object's content by ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>>;

    /// Write content and return its content-addressed ID.
    fn write(&self, data: &[u8]) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// All object IDs in the store, sorted.
    fn ids(&self) -> StoreResult<Vec<ObjectId>>;

    /// Compute the ID `content` would be stored under, without storing it.
    fn hash(&self, content: &[u8]) -> ObjectId {
        ObjectId::from_content(content)
    }

    /// Read an object, failing with [`StoreError::NotFound`] if absent.
    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }

    /// Store text content (UTF-8 encoded).
    fn store(&self, content: &str) -> StoreResult<ObjectId> {
        self.write(content.as_bytes())
    }

    /// Retrieve an object as text.
    ///
    /// Non-UTF-8 content is reported as [`StoreError::CorruptObject`].
    fn retrieve(&self, id: &ObjectId) -> StoreResult<String> {
        let data = self.get(id)?;
        String::from_utf8(data).map_err(|e| StoreError::CorruptObject {
            id: *id,
            reason: format!("content is not valid UTF-8: {e}"),
        })
    }
}
