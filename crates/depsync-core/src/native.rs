//! Platform-Specific Rebuild
//!
//! Rebuild native modules for this host, then ignore whatever build outputs
//! the rebuild left behind in the dependency repository.

use depsync_fs::SyncPath;
use depsync_npm::plan_rebuild;

use crate::context::SyncContext;
use crate::ignore::IgnoreSet;
use crate::Result;

/// What a rebuild did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    /// Number of `rebuild` invocations
    pub groups: usize,
    /// Packages left out because they require another platform
    pub skipped: Vec<String>,
    /// Size of the ignore set after the merge
    pub ignored: usize,
}

/// Rebuild installed packages and refresh the ignore-file.
///
/// Any failing rebuild group aborts the whole rebuild.
pub async fn rebuild_native(ctx: &SyncContext<'_>) -> Result<RebuildSummary> {
    let installed = depsync_fs::io::list_installed_packages(&ctx.deps_dir)?;
    let plan = plan_rebuild(&installed, ctx.platform, ctx.npm.program());

    tracing::info!(
        packages = installed.len(),
        groups = plan.groups.len(),
        skipped = plan.skipped.len(),
        platform = %ctx.platform,
        "Rebuilding native modules"
    );

    for group in &plan.groups {
        ctx.npm.rebuild(ctx.working_dir, &group.packages).await?;
    }

    let status = ctx.vcs.status(&ctx.deps_dir).await?;
    let ignore_path = ctx.ignore_file();
    let mut ignore = IgnoreSet::load(&ignore_path)?;
    ignore.extend_paths(
        status
            .untracked
            .iter()
            .filter(|path| path.as_str() != SyncPath::IgnoreFile.as_str()),
    );
    ignore.save(&ignore_path)?;
    ctx.vcs.add(&ctx.deps_dir, SyncPath::IgnoreFile.as_str()).await?;

    tracing::debug!(patterns = ignore.len(), "Updated ignore-file");

    Ok(RebuildSummary {
        groups: plan.groups.len(),
        skipped: plan.skipped.into_iter().map(|(name, _)| name).collect(),
        ignored: ignore.len(),
    })
}
