//! Everything a sync path needs, bundled for one run

use std::path::{Path, PathBuf};

use depsync_fs::SyncPath;
use depsync_git::Vcs;
use depsync_npm::{PackageManager, Platform};

use crate::config::SyncConfig;

/// Collaborators and locations shared by the prober and both sync paths.
///
/// The working directory is explicit: no operation relies on the process
/// current directory.
pub struct SyncContext<'a> {
    pub vcs: &'a dyn Vcs,
    pub npm: &'a dyn PackageManager,
    pub config: &'a SyncConfig,
    /// Project directory holding the manifest
    pub working_dir: &'a Path,
    /// Dependency directory, which is also the secondary repository
    pub deps_dir: PathBuf,
    /// URL of the secondary repository
    pub repo_url: &'a str,
    /// Host platform for rebuild filtering
    pub platform: &'a Platform,
}

impl<'a> SyncContext<'a> {
    pub fn new(
        vcs: &'a dyn Vcs,
        npm: &'a dyn PackageManager,
        config: &'a SyncConfig,
        working_dir: &'a Path,
        repo_url: &'a str,
        platform: &'a Platform,
    ) -> Self {
        Self {
            vcs,
            npm,
            config,
            working_dir,
            deps_dir: working_dir.join(SyncPath::Dependencies),
            repo_url,
            platform,
        }
    }

    /// The ignore-file inside the dependency repository.
    pub fn ignore_file(&self) -> PathBuf {
        self.deps_dir.join(SyncPath::IgnoreFile)
    }
}
