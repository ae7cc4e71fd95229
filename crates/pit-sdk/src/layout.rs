use std::path::{Path, PathBuf};

/// Name of the repository metadata directory.
pub const VCS_DIR: &str = ".vcs";

/// Paths of everything Pit keeps on disk for one repository.
///
/// ```text
/// <root>/.vcs/
///   objects/<hash>   compressed objects
///   commits/<hash>   commit records
///   index            staging index (JSON)
///   HEAD             latest commit ID
///   config.toml      repository configuration
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoLayout {
    pub root: PathBuf,
    pub vcs_dir: PathBuf,
    pub objects_dir: PathBuf,
    pub commits_dir: PathBuf,
    pub index_file: PathBuf,
    pub head_file: PathBuf,
    pub config_file: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let vcs_dir = root.join(VCS_DIR);
        Self {
            objects_dir: vcs_dir.join("objects"),
            commits_dir: vcs_dir.join("commits"),
            index_file: vcs_dir.join("index"),
            head_file: vcs_dir.join("HEAD"),
            config_file: vcs_dir.join("config.toml"),
            vcs_dir,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the directories bootstrap creates are all present.
    pub fn is_initialized(&self) -> bool {
        self.vcs_dir.is_dir() && self.objects_dir.is_dir() && self.commits_dir.is_dir()
    }
}
