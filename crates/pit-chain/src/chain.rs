//! Commit creation, lookup and history traversal.
//!
//! Every commit is persisted twice: as a generic object in the object store
//! (so it is retrievable like any other content) and as a plain-text record
//! in the commit directory, named by its ID (so commits can be enumerated
//! without scanning every object).
//!
//! # Ordering
//!
//! HEAD is authoritative for "latest". Repositories that have commit records
//! but no HEAD file fall back to the record with the newest creation time,
//! ties broken by ID.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use pit_index::IndexSnapshot;
use pit_refs::HeadRef;
use pit_store::ObjectStore;
use pit_types::{ObjectId, Timestamp};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::commit::Commit;
use crate::error::{ChainError, ChainResult};

/// The parent-linked chain of commits.
pub struct CommitChain {
    /// Directory holding one record per commit.
    commits_dir: PathBuf,
    /// Object store every commit is also written to.
    store: Arc<dyn ObjectStore>,
    /// Pointer to the latest commit.
    head: HeadRef,
}

impl std::fmt::Debug for CommitChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitChain")
            .field("commits_dir", &self.commits_dir)
            .field("head", &self.head.path())
            .finish()
    }
}

impl CommitChain {
    pub fn new(commits_dir: impl Into<PathBuf>, store: Arc<dyn ObjectStore>, head: HeadRef) -> Self {
        Self {
            commits_dir: commits_dir.into(),
            store,
            head,
        }
    }

    /// Directory holding the commit records.
    pub fn commits_dir(&self) -> &Path {
        &self.commits_dir
    }

    /// Path of the record for `id`.
    pub fn record_path(&self, id: &ObjectId) -> PathBuf {
        self.commits_dir.join(id.to_hex())
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    /// The most recent commit, or `None` if there are no commits.
    pub fn latest(&self) -> ChainResult<Option<ObjectId>> {
        match self.head.read()? {
            Some(id) => Ok(Some(id)),
            None => self.scan_latest(),
        }
    }

    /// Newest commit record by creation time, ties broken by ID.
    fn scan_latest(&self) -> ChainResult<Option<ObjectId>> {
        let mut newest: Option<(SystemTime, ObjectId)> = None;
        for (id, path) in self.records()? {
            let metadata = fs::metadata(&path)?;
            let created = metadata.created().or_else(|_| metadata.modified())?;
            let candidate = (created, id);
            if newest.map_or(true, |current| candidate > current) {
                newest = Some(candidate);
            }
        }
        if let Some((_, id)) = newest {
            debug!(id = %id, "latest commit resolved by scan");
        }
        Ok(newest.map(|(_, id)| id))
    }

    /// IDs of all commit records, sorted.
    pub fn ids(&self) -> ChainResult<Vec<ObjectId>> {
        Ok(self.records()?.into_iter().map(|(id, _)| id).collect())
    }

    fn records(&self) -> ChainResult<Vec<(ObjectId, PathBuf)>> {
        let entries = match fs::read_dir(&self.commits_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut records = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<ObjectId>().ok())
            {
                records.push((id, entry.path()));
            }
        }
        records.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(records)
    }

    /// Load a commit from its record, verifying it against its ID.
    pub fn get(&self, id: &ObjectId) -> ChainResult<Commit> {
        let text = match fs::read_to_string(self.record_path(id)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ChainError::CommitNotFound(*id))
            }
            Err(e) => return Err(e.into()),
        };
        if ObjectId::from_content(text.as_bytes()) != *id {
            return Err(ChainError::CorruptCommit {
                id: *id,
                reason: "record does not hash to its ID".into(),
            });
        }
        Commit::from_text(&text).map_err(|e| ChainError::CorruptCommit {
            id: *id,
            reason: e.to_string(),
        })
    }

    /// Returns `true` if a record exists for `id`.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.record_path(id).is_file()
    }

    /// Walk parent links from `start` (or the latest commit), newest first.
    pub fn history(
        &self,
        start: Option<ObjectId>,
        limit: usize,
    ) -> ChainResult<Vec<(ObjectId, Commit)>> {
        let mut next = match start {
            Some(id) => Some(id),
            None => self.latest()?,
        };
        let mut out = Vec::new();
        while let Some(id) = next {
            if out.len() >= limit {
                break;
            }
            let commit = self.get(&id)?;
            next = commit.parent;
            out.push((id, commit));
        }
        Ok(out)
    }

    // ---------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------

    /// Record `files` as a new commit on top of the latest one.
    ///
    /// Fails with [`ChainError::NothingToCommit`] if `files` is empty. The
    /// parent is taken by ID only; its record is not read.
    pub fn create(&self, message: &str, files: IndexSnapshot) -> ChainResult<ObjectId> {
        if message.trim().is_empty() {
            return Err(ChainError::EmptyMessage);
        }
        if files.is_empty() {
            return Err(ChainError::NothingToCommit);
        }

        let head = self.head.read()?;
        let parent = match head {
            Some(id) => Some(id),
            None => self.scan_latest()?,
        };

        let commit = Commit::new(message, Timestamp::now(), files, parent);
        let text = commit
            .to_text()
            .map_err(|e| ChainError::Serialization(e.to_string()))?;

        let id = self.store.store(&text)?;
        self.write_record(&id, &text)?;
        self.head.update(head, id)?;

        info!(
            id = %id,
            parent = ?parent,
            files = commit.files.len(),
            "commit created"
        );
        Ok(id)
    }

    fn write_record(&self, id: &ObjectId, text: &str) -> ChainResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.commits_dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.record_path(id)).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pit_index::IndexEntry;
    use pit_store::FsObjectStore;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<FsObjectStore>,
        chain: CommitChain,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let objects = dir.path().join("objects");
        let commits = dir.path().join("commits");
        fs::create_dir_all(&objects).unwrap();
        fs::create_dir_all(&commits).unwrap();
        let store = Arc::new(FsObjectStore::new(objects));
        let head = HeadRef::new(dir.path().join("HEAD"));
        let chain = CommitChain::new(commits, store.clone(), head);
        Fixture {
            _dir: dir,
            store,
            chain,
        }
    }

    fn snapshot(pairs: &[(&str, &str)]) -> IndexSnapshot {
        pairs
            .iter()
            .map(|(path, content)| {
                (
                    path.to_string(),
                    IndexEntry::new(
                        ObjectId::from_content(content.as_bytes()),
                        Timestamp::from_secs(100),
                    ),
                )
            })
            .collect()
    }

    #[test]
    fn empty_chain_has_no_latest() {
        let fx = fixture();
        assert!(fx.chain.latest().unwrap().is_none());
        assert!(fx.chain.ids().unwrap().is_empty());
        assert!(fx.chain.history(None, 10).unwrap().is_empty());
    }

    #[test]
    fn empty_snapshot_is_nothing_to_commit() {
        let fx = fixture();
        let err = fx.chain.create("msg", IndexSnapshot::new()).unwrap_err();
        assert!(matches!(err, ChainError::NothingToCommit));
        assert!(fx.chain.ids().unwrap().is_empty());
        assert!(fx.chain.latest().unwrap().is_none());
    }

    #[test]
    fn blank_message_is_rejected() {
        let fx = fixture();
        let err = fx.chain.create("  \n", snapshot(&[("a", "a")])).unwrap_err();
        assert!(matches!(err, ChainError::EmptyMessage));
    }

    #[test]
    fn first_commit_is_root_and_becomes_latest() {
        let fx = fixture();
        let files = snapshot(&[("a.txt", "hello")]);
        let id = fx.chain.create("add a", files.clone()).unwrap();

        assert_eq!(fx.chain.latest().unwrap(), Some(id));
        let commit = fx.chain.get(&id).unwrap();
        assert!(commit.is_root());
        assert_eq!(commit.message, "add a");
        assert_eq!(commit.files, files);
        assert_eq!(commit.id().unwrap(), id);
    }

    #[test]
    fn commit_is_also_a_generic_object() {
        let fx = fixture();
        let id = fx.chain.create("m", snapshot(&[("a", "a")])).unwrap();

        let text = fx.store.retrieve(&id).unwrap();
        assert_eq!(text, fs::read_to_string(fx.chain.record_path(&id)).unwrap());
        assert_eq!(Commit::from_text(&text).unwrap(), fx.chain.get(&id).unwrap());
    }

    #[test]
    fn second_commit_links_to_first() {
        let fx = fixture();
        let c1 = fx.chain.create("first", snapshot(&[("a", "a")])).unwrap();
        let c2 = fx
            .chain
            .create("second", snapshot(&[("a", "a"), ("b", "b")]))
            .unwrap();

        assert_eq!(fx.chain.get(&c2).unwrap().parent, Some(c1));
        assert_eq!(fx.chain.latest().unwrap(), Some(c2));

        let history = fx.chain.history(None, 10).unwrap();
        let ids: Vec<_> = history.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![c2, c1]);
        assert_eq!(fx.chain.history(None, 1).unwrap().len(), 1);
        assert_eq!(fx.chain.history(Some(c1), 10).unwrap().len(), 1);
    }

    #[test]
    fn earlier_commit_files_are_a_snapshot() {
        let fx = fixture();
        let first_files = snapshot(&[("a", "a")]);
        let c1 = fx.chain.create("first", first_files.clone()).unwrap();
        fx.chain
            .create("second", snapshot(&[("a", "changed"), ("b", "b")]))
            .unwrap();

        assert_eq!(fx.chain.get(&c1).unwrap().files, first_files);
    }

    #[test]
    fn unchanged_snapshot_still_creates_child() {
        let fx = fixture();
        let files = snapshot(&[("a", "a")]);
        let c1 = fx.chain.create("first", files.clone()).unwrap();
        let c2 = fx.chain.create("again", files.clone()).unwrap();

        assert_ne!(c1, c2);
        let second = fx.chain.get(&c2).unwrap();
        assert_eq!(second.parent, Some(c1));
        assert_eq!(second.files, files);
        assert_eq!(fx.chain.latest().unwrap(), Some(c2));
    }

    #[test]
    fn damaged_head_record_does_not_block_commits() {
        let fx = fixture();
        let c1 = fx.chain.create("first", snapshot(&[("a", "a")])).unwrap();
        fs::write(fx.chain.record_path(&c1), "{}").unwrap();

        let c2 = fx.chain.create("second", snapshot(&[("b", "b")])).unwrap();
        assert_eq!(fx.chain.get(&c2).unwrap().parent, Some(c1));

        fs::remove_file(fx.chain.record_path(&c1)).unwrap();
        let c3 = fx.chain.create("third", snapshot(&[("c", "c")])).unwrap();
        assert_eq!(fx.chain.get(&c3).unwrap().parent, Some(c2));
    }

    #[test]
    fn unknown_commit_is_not_found() {
        let fx = fixture();
        let id = ObjectId::from_content(b"nope");
        assert!(!fx.chain.contains(&id));
        assert!(matches!(fx.chain.get(&id), Err(ChainError::CommitNotFound(_))));
    }

    #[test]
    fn tampered_record_is_corrupt() {
        let fx = fixture();
        let id = fx.chain.create("m", snapshot(&[("a", "a")])).unwrap();
        fs::write(fx.chain.record_path(&id), "{}").unwrap();
        assert!(matches!(
            fx.chain.get(&id),
            Err(ChainError::CorruptCommit { .. })
        ));
    }

    #[test]
    fn latest_falls_back_to_scan_without_head() {
        let fx = fixture();
        let c1 = fx.chain.create("first", snapshot(&[("a", "a")])).unwrap();
        fs::remove_file(fx.chain.head.path()).unwrap();

        assert_eq!(fx.chain.latest().unwrap(), Some(c1));

        // A commit made without HEAD still links to the scanned parent and
        // re-establishes HEAD.
        let c2 = fx.chain.create("second", snapshot(&[("b", "b")])).unwrap();
        assert_eq!(fx.chain.get(&c2).unwrap().parent, Some(c1));
        assert_eq!(fx.chain.head.read().unwrap(), Some(c2));
    }
}
