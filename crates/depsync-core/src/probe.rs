//! Repository State Prober
//!
//! Classifies the dependency directory against the target fingerprint. The
//! classification is computed once per run and selects the sync path.

use std::fmt;

use crate::context::SyncContext;
use crate::fingerprint::Fingerprint;
use crate::Result;

/// Relationship of the dependency repository to the target fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    /// No usable repository was present; a fresh clone now sits in its place
    Absent,
    /// The checked-out commit already carries the fingerprint tag
    PresentMatchingTag,
    /// A repository for the right remote exists but is at some other commit
    PresentDivergent,
}

impl fmt::Display for RepositoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::PresentMatchingTag => write!(f, "present, matching tag"),
            Self::PresentDivergent => write!(f, "present, divergent"),
        }
    }
}

/// Probe the dependency directory.
///
/// Side effects: on `Absent` the directory is replaced by a fresh clone of the
/// repository; on `PresentDivergent` tags are fetched from it.
pub async fn probe(ctx: &SyncContext<'_>, fingerprint: &Fingerprint) -> Result<RepositoryState> {
    let deps = ctx.deps_dir.as_path();

    if !is_tracking_remote(ctx).await? {
        tracing::info!(
            dir = %deps.display(),
            repo = ctx.repo_url,
            "Dependency repository absent, cloning"
        );
        depsync_fs::io::remove_dir_if_exists(deps)?;
        ctx.vcs.clone_repo(ctx.repo_url, deps).await?;
        return Ok(RepositoryState::Absent);
    }

    // A clone of an empty remote has no HEAD commit, hence no tags at HEAD
    let tags = if ctx.vcs.rev_exists(deps, "HEAD").await? {
        ctx.vcs.tags_at_head(deps).await?
    } else {
        Vec::new()
    };

    if tags.iter().any(|t| t == fingerprint.as_str()) {
        tracing::info!(%fingerprint, "Dependency repository already at fingerprint");
        return Ok(RepositoryState::PresentMatchingTag);
    }

    tracing::info!(%fingerprint, "Dependency repository diverges, fetching tags");
    ctx.vcs.fetch_tags(deps, ctx.repo_url).await?;
    Ok(RepositoryState::PresentDivergent)
}

/// Whether the dependency directory is a repository with the configured URL
/// among its remotes.
async fn is_tracking_remote(ctx: &SyncContext<'_>) -> Result<bool> {
    let deps = ctx.deps_dir.as_path();
    if !deps.is_dir() || !ctx.vcs.is_repository(deps) {
        return Ok(false);
    }

    let wanted = normalize_url(ctx.repo_url);
    let remotes = ctx.vcs.remotes(deps).await?;
    Ok(remotes.iter().any(|r| normalize_url(&r.url) == wanted))
}

fn normalize_url(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}
