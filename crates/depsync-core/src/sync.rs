//! The Synchronizer
//!
//! One run: fingerprint the manifest, probe the dependency repository, then
//! either do nothing (already at the fingerprint), reuse a published tree,
//! or install and publish a new one.

use std::fmt;
use std::path::{Path, PathBuf};

use depsync_fs::{RunLock, SyncPath};
use depsync_git::{TagOutcome, Vcs};
use depsync_npm::{PackageManager, Platform};

use crate::config::SyncConfig;
use crate::context::SyncContext;
use crate::fingerprint::Fingerprint;
use crate::manifest::Manifest;
use crate::probe::{RepositoryState, probe};
use crate::publish::install_and_publish;
use crate::reuse::{FallthroughReason, ReuseOutcome, try_reuse};
use crate::Result;

/// Which branch of the protocol a run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// The dependency repository was already at the fingerprint
    UpToDate,
    /// A previously published tree was checked out
    Reused,
    /// A fresh install was committed, tagged and pushed
    Published,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate => write!(f, "up to date"),
            Self::Reused => write!(f, "reused"),
            Self::Published => write!(f, "published"),
        }
    }
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub fingerprint: Fingerprint,
    pub state: RepositoryState,
    pub action: SyncAction,
    /// Why reuse was abandoned, when it was attempted and failed
    pub fallthrough: Option<FallthroughReason>,
    /// Whether a commit was created
    pub committed: bool,
    pub tag: Option<TagOutcome>,
}

/// Drives one sync of a project's dependency directory.
pub struct Synchronizer<V, P> {
    vcs: V,
    npm: P,
    config: SyncConfig,
    working_dir: PathBuf,
    platform: Platform,
}

impl<V: Vcs, P: PackageManager> Synchronizer<V, P> {
    pub fn new(vcs: V, npm: P, config: SyncConfig, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            vcs,
            npm,
            config,
            working_dir: working_dir.into(),
            platform: Platform::current(),
        }
    }

    /// Override the host platform used to filter native rebuilds.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    pub fn package_manager(&self) -> &P {
        &self.npm
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run the synchronizer.
    ///
    /// Holds the per-directory run lock for the whole run.
    pub async fn run(&self) -> Result<SyncReport> {
        let repo_url = self.config.repo_url()?;
        let _lock = RunLock::acquire(&self.working_dir)?;

        let manifest = Manifest::load(&self.working_dir.join(SyncPath::Manifest))?;
        let fingerprint = Fingerprint::compute(&manifest);
        tracing::info!(%fingerprint, dir = %self.working_dir.display(), "Syncing dependencies");

        let ctx = SyncContext::new(
            &self.vcs,
            &self.npm,
            &self.config,
            &self.working_dir,
            repo_url,
            &self.platform,
        );

        let state = probe(&ctx, &fingerprint).await?;
        let mut report = SyncReport {
            fingerprint,
            state,
            action: SyncAction::UpToDate,
            fallthrough: None,
            committed: false,
            tag: None,
        };

        if state == RepositoryState::PresentMatchingTag {
            return Ok(report);
        }

        match try_reuse(&ctx, &manifest, &report.fingerprint).await {
            ReuseOutcome::Reused => {
                report.action = SyncAction::Reused;
            }
            ReuseOutcome::Fallthrough(reason) => {
                let published = install_and_publish(&ctx, &manifest, &report.fingerprint).await?;
                report.action = SyncAction::Published;
                report.fallthrough = Some(reason);
                report.committed = published.committed;
                report.tag = published.tag;
            }
        }

        tracing::info!(action = %report.action, fingerprint = %report.fingerprint, "Sync complete");
        Ok(report)
    }
}
