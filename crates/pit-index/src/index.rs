//! The persisted staging index.
//!
//! [`StagingIndex`] is a handle over the index file; it holds no entries in
//! memory. Every mutation reads the whole mapping, changes it, and replaces
//! the file wholesale through a temporary file and an atomic rename.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pit_store::ObjectStore;
use pit_types::{ObjectId, Timestamp};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::entry::{IndexEntry, IndexSnapshot};
use crate::error::{IndexError, IndexResult};

/// The staging index: which file contents go into the next commit.
pub struct StagingIndex {
    /// Location of the index file.
    path: PathBuf,
    /// The object store staged contents are written to.
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for StagingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingIndex")
            .field("path", &self.path)
            .finish()
    }
}

impl StagingIndex {
    /// Create a handle over the index file at `path`, backed by `store`.
    pub fn new(path: impl Into<PathBuf>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            path: path.into(),
            store,
        }
    }

    /// Location of the index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted mapping.
    ///
    /// A missing or blank index file is the empty mapping.
    pub fn read(&self) -> IndexResult<IndexSnapshot> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexSnapshot::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(IndexSnapshot::new());
        }
        serde_json::from_str(&text).map_err(|e| IndexError::CorruptIndex(e.to_string()))
    }

    /// Persist `snapshot`, replacing the previous contents atomically.
    pub fn write(&self, snapshot: &IndexSnapshot) -> IndexResult<()> {
        let text = serde_json::to_string_pretty(snapshot)
            .map_err(|e| IndexError::CorruptIndex(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(entries = snapshot.len(), "index written");
        Ok(())
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Look up the entry for `path`.
    pub fn get(&self, path: &str) -> IndexResult<Option<IndexEntry>> {
        Ok(self.read()?.remove(path))
    }

    /// Stage the current contents of `file` under the key `path`.
    ///
    /// The file's bytes are written to the object store and the entry for
    /// `path` is replaced unconditionally. On any failure the index file is
    /// left untouched.
    pub fn stage(&self, path: &str, file: &Path) -> IndexResult<ObjectId> {
        if path.is_empty() {
            return Err(IndexError::InvalidPath("empty path".to_string()));
        }

        let metadata = fs::metadata(file).map_err(|e| not_found_or(e, file))?;
        if !metadata.is_file() {
            return Err(IndexError::InvalidPath(format!(
                "{} is not a regular file",
                file.display()
            )));
        }
        let content = fs::read(file).map_err(|e| not_found_or(e, file))?;
        let timestamp = Timestamp::from_system_time(metadata.modified()?);

        let id = self.store.write(&content)?;

        let mut snapshot = self.read()?;
        snapshot.insert(path.to_string(), IndexEntry::new(id, timestamp));
        self.write(&snapshot)?;

        debug!(path, id = %id, size = content.len(), "file staged");
        Ok(id)
    }

    /// Remove the entry for `path`.
    pub fn unstage(&self, path: &str) -> IndexResult<IndexEntry> {
        let mut snapshot = self.read()?;
        let entry = snapshot
            .remove(path)
            .ok_or_else(|| IndexError::PathNotFound(path.to_string()))?;
        self.write(&snapshot)?;
        debug!(path, "file unstaged");
        Ok(entry)
    }

    /// Remove every entry.
    pub fn clear(&self) -> IndexResult<()> {
        self.write(&IndexSnapshot::new())
    }
}

fn not_found_or(e: io::Error, file: &Path) -> IndexError {
    if e.kind() == io::ErrorKind::NotFound {
        IndexError::FileNotFound(file.to_path_buf())
    } else {
        IndexError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pit_store::InMemoryObjectStore;

    struct Fixture {
        dir: tempfile::TempDir,
        store: Arc<InMemoryObjectStore>,
        index: StagingIndex,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryObjectStore::new());
        let index = StagingIndex::new(dir.path().join("index"), store.clone());
        Fixture { dir, store, index }
    }

    impl Fixture {
        fn file(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            fs::write(&path, content).unwrap();
            path
        }
    }

    #[test]
    fn missing_index_reads_empty() {
        let fx = fixture();
        assert!(fx.index.read().unwrap().is_empty());
        assert!(fx.index.is_empty().unwrap());
    }

    #[test]
    fn blank_index_reads_empty() {
        let fx = fixture();
        fs::write(fx.index.path(), "\n").unwrap();
        assert!(fx.index.read().unwrap().is_empty());
    }

    #[test]
    fn corrupt_index_is_reported() {
        let fx = fixture();
        fs::write(fx.index.path(), "[1, 2").unwrap();
        assert!(matches!(fx.index.read(), Err(IndexError::CorruptIndex(_))));
    }

    #[test]
    fn write_then_read() {
        let fx = fixture();
        let mut snap = IndexSnapshot::new();
        snap.insert(
            "a.txt".into(),
            IndexEntry::new(ObjectId::from_content(b"a"), Timestamp::from_secs(5)),
        );
        fx.index.write(&snap).unwrap();
        assert_eq!(fx.index.read().unwrap(), snap);
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let fx = fixture();
        fx.index.write(&IndexSnapshot::new()).unwrap();
        let names: Vec<_> = fs::read_dir(fx.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("index")]);
    }

    #[test]
    fn stage_stores_content_and_records_entry() {
        let fx = fixture();
        let file = fx.file("a.txt", "hello");
        let id = fx.index.stage("a.txt", &file).unwrap();

        assert_eq!(id, ObjectId::from_content(b"hello"));
        assert_eq!(fx.store.retrieve(&id).unwrap(), "hello");

        let entry = fx.index.get("a.txt").unwrap().unwrap();
        assert_eq!(entry.hash, id);
        let mtime = fs::metadata(&file).unwrap().modified().unwrap();
        assert_eq!(entry.timestamp, Timestamp::from_system_time(mtime));
    }

    #[test]
    fn restage_overwrites_entry() {
        let fx = fixture();
        let file = fx.file("a.txt", "v1");
        fx.index.stage("a.txt", &file).unwrap();
        fs::write(&file, "v2").unwrap();
        let id2 = fx.index.stage("a.txt", &file).unwrap();

        let snap = fx.index.read().unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap["a.txt"].hash, id2);
        assert_eq!(id2, ObjectId::from_content(b"v2"));
    }

    #[test]
    fn stage_missing_file_leaves_index_unchanged() {
        let fx = fixture();
        let file = fx.file("a.txt", "keep");
        fx.index.stage("a.txt", &file).unwrap();
        let before = fs::read(fx.index.path()).unwrap();

        let missing = fx.dir.path().join("nope.txt");
        let err = fx.index.stage("nope.txt", &missing).unwrap_err();
        assert!(matches!(err, IndexError::FileNotFound(p) if p == missing));
        assert_eq!(fs::read(fx.index.path()).unwrap(), before);
    }

    #[test]
    fn stage_directory_is_rejected() {
        let fx = fixture();
        let sub = fx.dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let err = fx.index.stage("sub", &sub).unwrap_err();
        assert!(matches!(err, IndexError::InvalidPath(_)));
        assert!(fx.index.is_empty().unwrap());
    }

    #[test]
    fn stage_rejects_empty_key() {
        let fx = fixture();
        let file = fx.file("a.txt", "x");
        assert!(matches!(
            fx.index.stage("", &file),
            Err(IndexError::InvalidPath(_))
        ));
    }

    #[test]
    fn identical_files_share_one_object() {
        let fx = fixture();
        let a = fx.file("a.txt", "same");
        let b = fx.file("b.txt", "same");
        let ia = fx.index.stage("a.txt", &a).unwrap();
        let ib = fx.index.stage("b.txt", &b).unwrap();
        assert_eq!(ia, ib);
        assert_eq!(fx.store.len(), 1);
        assert_eq!(fx.index.read().unwrap().len(), 2);
    }

    #[test]
    fn unstage_and_clear() {
        let fx = fixture();
        let a = fx.file("a.txt", "a");
        let b = fx.file("b.txt", "b");
        fx.index.stage("a.txt", &a).unwrap();
        fx.index.stage("b.txt", &b).unwrap();

        let removed = fx.index.unstage("a.txt").unwrap();
        assert_eq!(removed.hash, ObjectId::from_content(b"a"));
        assert!(fx.index.get("a.txt").unwrap().is_none());
        assert!(matches!(
            fx.index.unstage("a.txt"),
            Err(IndexError::PathNotFound(_))
        ));

        fx.index.clear().unwrap();
        assert!(fx.index.is_empty().unwrap());
    }
}
