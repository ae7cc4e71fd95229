//! Filesystem-backed object store.
//!
//! Each object lives in a single file named by the hex form of its ID,
//! holding the zstd-compressed content:
//!
//! ```text
//! objects/
//!   3f1c...e2a0    -- zstd frame of the original bytes
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pit_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Default zstd compression level.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Object store rooted at a directory on disk.
///
/// Writes go to a temporary file inside the object directory which is then
/// atomically renamed to its final name, so a reader never observes a
/// partially written object and concurrent writers of the same ID are
/// harmless.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    dir: PathBuf,
    compression_level: i32,
}

impl FsObjectStore {
    /// Open a store over an existing directory.
    ///
    /// The directory is not created here; repository bootstrap owns the
    /// on-disk layout.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Use a specific zstd compression level for new objects.
    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    /// The object directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.dir.join(id.to_hex())
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let data = zstd::decode_all(compressed.as_slice()).map_err(|e| {
            warn!(id = %id, error = %e, "failed to decompress object");
            StoreError::CorruptObject {
                id: *id,
                reason: format!("decompression failed: {e}"),
            }
        })?;

        let computed = ObjectId::from_content(&data);
        if computed != *id {
            warn!(id = %id, computed = %computed, "object digest mismatch");
            return Err(StoreError::CorruptObject {
                id: *id,
                reason: format!("digest mismatch: content hashes to {computed}"),
            });
        }

        Ok(Some(data))
    }

    fn write(&self, data: &[u8]) -> StoreResult<ObjectId> {
        let id = ObjectId::from_content(data);
        let path = self.object_path(&id);
        if path.exists() {
            match self.read(&id) {
                Ok(Some(_)) => {
                    debug!(id = %id, "object already stored");
                    return Ok(id);
                }
                Ok(None) => {}
                Err(StoreError::CorruptObject { reason, .. }) => {
                    warn!(id = %id, reason = %reason, "rewriting corrupt object");
                }
                Err(e) => return Err(e),
            }
        }

        let compressed = zstd::encode_all(data, self.compression_level)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&compressed)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(
            id = %id,
            size = data.len(),
            compressed = compressed.len(),
            "object written"
        );
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            // Temporary files from in-flight writes never parse as IDs.
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<ObjectId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}
