use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use pit_chain::{Commit, CommitChain};
use pit_index::{IndexSnapshot, StagingIndex};
use pit_refs::HeadRef;
use pit_store::{FsObjectStore, ObjectStore};
use pit_types::ObjectId;
use tracing::{debug, info};

use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};
use crate::layout::RepoLayout;
use crate::summary::CommitSummary;

/// Handle to one Pit repository.
///
/// Owns the repository root and its configuration; every operation goes
/// through a handle, there is no process-wide state.
pub struct Pit {
    layout: RepoLayout,
    config: RepoConfig,
    store: Arc<FsObjectStore>,
    index: StagingIndex,
    chain: CommitChain,
}

impl std::fmt::Debug for Pit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pit")
            .field("root", &self.layout.root)
            .field("config", &self.config)
            .finish()
    }
}

impl Pit {
    /// Create a handle for the repository at `root` without touching disk
    /// beyond reading the configuration, if any.
    pub fn new(root: impl Into<PathBuf>) -> SdkResult<Self> {
        let root = root.into();
        let root = fs::canonicalize(&root).unwrap_or(root);
        let layout = RepoLayout::new(root);
        let config = RepoConfig::load(&layout.config_file)?;

        let store = Arc::new(
            FsObjectStore::new(&layout.objects_dir)
                .with_compression_level(config.core.compression_level),
        );
        let index = StagingIndex::new(&layout.index_file, store.clone());
        let chain = CommitChain::new(
            &layout.commits_dir,
            store.clone(),
            HeadRef::new(&layout.head_file),
        );

        Ok(Self {
            layout,
            config,
            store,
            index,
            chain,
        })
    }

    /// Create the repository at `root` if needed and return a handle.
    pub fn init(root: impl Into<PathBuf>) -> SdkResult<Self> {
        let pit = Self::new(root)?;
        pit.init_repo()?;
        Ok(pit)
    }

    /// Open an existing repository.
    pub fn open(root: impl Into<PathBuf>) -> SdkResult<Self> {
        let pit = Self::new(root)?;
        pit.ensure_initialized()?;
        Ok(pit)
    }

    // ---- Bootstrap ----

    /// Ensure the on-disk layout exists.
    ///
    /// Idempotent: an existing index or configuration is never overwritten.
    /// Returns `true` if the repository did not exist before.
    pub fn init_repo(&self) -> SdkResult<bool> {
        let created = !self.layout.vcs_dir.exists();

        for dir in [
            &self.layout.vcs_dir,
            &self.layout.objects_dir,
            &self.layout.commits_dir,
        ] {
            fs::create_dir_all(dir)?;
        }

        if !self.layout.index_file.exists() {
            self.index.write(&IndexSnapshot::new())?;
        }
        if !self.layout.config_file.exists() {
            self.config.save(&self.layout.config_file)?;
        }

        if created {
            info!(root = %self.layout.root.display(), "initialized repository");
        } else {
            debug!(root = %self.layout.root.display(), "repository already initialized");
        }
        Ok(created)
    }

    /// Whether the repository layout exists on disk.
    pub fn is_initialized(&self) -> bool {
        self.layout.is_initialized()
    }

    fn ensure_initialized(&self) -> SdkResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(SdkError::NotInitialized(self.layout.root.clone()))
        }
    }

    // ---- Staging ----

    /// Stage the current contents of the file at `path`.
    ///
    /// Relative paths are resolved against the repository root. The index key
    /// is the root-relative path with `/` separators. A missing file is
    /// [`SdkError::FileNotFound`] wherever it would have been.
    pub fn stage(&self, path: impl AsRef<Path>) -> SdkResult<ObjectId> {
        self.ensure_initialized()?;
        let path = path.as_ref();
        let file = self.resolve(path);
        if let Err(e) = fs::metadata(&file) {
            return Err(if e.kind() == io::ErrorKind::NotFound {
                SdkError::FileNotFound(path.to_path_buf())
            } else {
                e.into()
            });
        }

        let key = self.index_key(path, &file)?;
        let id = self.index.stage(&key, &file)?;
        info!(path = %key, id = %id, "staged");
        Ok(id)
    }

    /// Remove `path` from the staging index.
    pub fn unstage(&self, path: impl AsRef<Path>) -> SdkResult<()> {
        self.ensure_initialized()?;
        let path = path.as_ref();
        let key = self.index_key(path, &self.resolve(path))?;
        self.index.unstage(&key).map_err(|e| match e {
            pit_index::IndexError::PathNotFound(p) => {
                SdkError::InvalidPath(format!("{p} is not staged"))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    /// The current staging index.
    pub fn status(&self) -> SdkResult<IndexSnapshot> {
        self.ensure_initialized()?;
        Ok(self.index.read()?)
    }

    /// Absolute, lexically normalized form of `path`.
    fn resolve(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.layout.root.join(path)
        };
        let mut out = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    out.pop();
                }
                other => out.push(other.as_os_str()),
            }
        }
        out
    }

    /// Root-relative key for the resolved `file`.
    fn index_key(&self, path: &Path, file: &Path) -> SdkResult<String> {
        let outside = || SdkError::InvalidPath(format!("{} is outside the repository", path.display()));

        let relative = match file.strip_prefix(&self.layout.root) {
            Ok(relative) => relative.to_path_buf(),
            // The root is canonical; the caller's path may reach it through a symlink.
            Err(_) => {
                let name = file.file_name().ok_or_else(outside)?;
                let parent = file
                    .parent()
                    .and_then(|p| fs::canonicalize(p).ok())
                    .ok_or_else(outside)?;
                parent
                    .join(name)
                    .strip_prefix(&self.layout.root)
                    .map_err(|_| outside())?
                    .to_path_buf()
            }
        };

        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            return Err(SdkError::InvalidPath(format!("{} is not a file", path.display())));
        }
        if parts[0] == crate::layout::VCS_DIR {
            return Err(SdkError::InvalidPath(format!(
                "{} is inside the repository metadata",
                path.display()
            )));
        }
        Ok(parts.join("/"))
    }

    // ---- Commits ----

    /// Commit the staging index.
    ///
    /// Fails with [`SdkError::NothingToCommit`] when nothing is staged.
    pub fn commit(&self, message: &str) -> SdkResult<ObjectId> {
        self.ensure_initialized()?;
        let files = self.index.read()?;
        let id = self.chain.create(message, files)?;
        if self.config.commit.clear_index {
            self.index.clear()?;
        }
        Ok(id)
    }

    /// The latest commit, if any.
    pub fn head(&self) -> SdkResult<Option<ObjectId>> {
        self.ensure_initialized()?;
        Ok(self.chain.latest()?)
    }

    /// Load a commit by ID.
    pub fn show(&self, id: &ObjectId) -> SdkResult<Commit> {
        self.ensure_initialized()?;
        Ok(self.chain.get(id)?)
    }

    /// Up to `limit` commits, newest first, following parent links.
    pub fn log(&self, limit: usize) -> SdkResult<Vec<CommitSummary>> {
        self.ensure_initialized()?;
        let history = self.chain.history(None, limit)?;
        Ok(history
            .iter()
            .map(|(id, commit)| CommitSummary::new(*id, commit))
            .collect())
    }

    // ---- Objects ----

    /// Retrieve any stored object as text.
    pub fn retrieve(&self, id: &ObjectId) -> SdkResult<String> {
        self.ensure_initialized()?;
        Ok(self.store.retrieve(id)?)
    }

    /// Retrieve any stored object as raw bytes.
    pub fn retrieve_bytes(&self, id: &ObjectId) -> SdkResult<Vec<u8>> {
        self.ensure_initialized()?;
        Ok(self.store.get(id)?)
    }

    // ---- Accessors ----

    pub fn root(&self) -> &Path {
        &self.layout.root
    }
    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }
    pub fn store(&self) -> &FsObjectStore {
        &self.store
    }
    pub fn index(&self) -> &StagingIndex {
        &self.index
    }
    pub fn chain(&self) -> &CommitChain {
        &self.chain
    }
}
