//! The HEAD pointer: the ID of the most recent commit.
//!
//! On disk HEAD is a single line of hex. Updates follow the lock-file
//! protocol:
//!
//! 1. Create `HEAD.lock` with create-new semantics; failure means another
//!    writer is mid-update.
//! 2. Re-read HEAD and compare it with the caller's expected value.
//! 3. Write the new ID into the lock file and rename it over `HEAD`.
//!
//! Readers therefore see either the old or the new value, never a torn one.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pit_types::ObjectId;
use tracing::{debug, warn};

use crate::error::{RefError, Result};

/// Handle over a HEAD file.
#[derive(Clone, Debug)]
pub struct HeadRef {
    path: PathBuf,
    lock_path: PathBuf,
}

impl HeadRef {
    /// Create a handle over the HEAD file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "HEAD".into());
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);
        Self { path, lock_path }
    }

    /// Location of the HEAD file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the lock file guarding updates.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Read the current HEAD.
    ///
    /// Returns `Ok(None)` if no commit has been recorded yet.
    pub fn read(&self) -> Result<Option<ObjectId>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<ObjectId>()
            .map(Some)
            .map_err(|e| RefError::InvalidHead(format!("{text:?}: {e}")))
    }

    /// Move HEAD from `expected` to `new`.
    ///
    /// Fails with [`RefError::HeadLocked`] if another update is in progress
    /// and with [`RefError::HeadMoved`] if HEAD no longer equals `expected`.
    pub fn update(&self, expected: Option<ObjectId>, new: ObjectId) -> Result<()> {
        let mut lock = HeadLock::acquire(&self.lock_path)?;

        let actual = self.read()?;
        if actual != expected {
            warn!(?expected, ?actual, "HEAD moved during update");
            return Err(RefError::moved(expected, actual));
        }

        lock.file.write_all(format!("{new}\n").as_bytes())?;
        lock.file.sync_all()?;
        lock.commit(&self.path)?;

        debug!(head = %new, "HEAD updated");
        Ok(())
    }
}

/// An acquired `HEAD.lock`. Removed on drop unless committed.
struct HeadLock<'a> {
    path: &'a Path,
    file: File,
    committed: bool,
}

impl<'a> HeadLock<'a> {
    fn acquire(path: &'a Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    RefError::HeadLocked {
                        lock: path.display().to_string(),
                    }
                } else {
                    RefError::Io(e)
                }
            })?;
        Ok(Self {
            path,
            file,
            committed: false,
        })
    }

    fn commit(mut self, target: &Path) -> Result<()> {
        fs::rename(self.path, target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for HeadLock<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(self.path);
        }
    }
}
