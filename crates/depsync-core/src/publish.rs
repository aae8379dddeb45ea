//! Install-and-Publish Path
//!
//! Install dependencies for real, commit the resulting tree to the dependency
//! repository, tag it with the fingerprint and push. Each step needs the
//! previous one to have succeeded; the first failure aborts the run and may
//! leave the dependency repository mid-way (it is not rolled back).

use depsync_git::TagOutcome;
use depsync_npm::InstallFlags;

use crate::context::SyncContext;
use crate::fingerprint::Fingerprint;
use crate::hooks::{LifecycleScript, run_lifecycle};
use crate::manifest::Manifest;
use crate::native::rebuild_native;
use crate::Result;

/// What the publish path did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Whether a commit was created (skipped when the tree was unchanged)
    pub committed: bool,
    /// Tag outcome; `None` when there was nothing to tag
    pub tag: Option<TagOutcome>,
}

/// Commit message for a published tree.
pub fn commit_message(manifest: &Manifest, npm_version: &str) -> String {
    format!(
        "depsync: installed {} with npm {}",
        manifest.display_id(),
        npm_version
    )
}

/// Install, commit, tag and push.
pub async fn install_and_publish(
    ctx: &SyncContext<'_>,
    manifest: &Manifest,
    fingerprint: &Fingerprint,
) -> Result<PublishReport> {
    let deps = ctx.deps_dir.as_path();
    let branch = ctx.config.branch.as_str();

    // 1. Start from the latest mainline to keep the later push fast-forward
    if ctx.vcs.rev_exists(deps, "HEAD").await? {
        tracing::info!(branch, "Updating dependency repository");
        ctx.vcs.stash(deps).await?;
        ctx.vcs.checkout(deps, branch).await?;
        ctx.vcs.pull(deps, ctx.repo_url, branch).await?;
    } else {
        tracing::info!(branch, "Dependency repository is empty, starting mainline");
        ctx.vcs.create_branch(deps, branch).await?;
    }

    // 2. Clean slate
    if !ctx.config.incremental_install {
        depsync_fs::io::clear_except_git(deps)?;
    }

    // 3-5. Install, with lifecycle scripts run by hand in cross-platform mode
    if ctx.config.cross_platform {
        run_lifecycle(ctx, manifest, LifecycleScript::Preinstall).await?;
    }
    if ctx.config.skip_install {
        tracing::info!("Skipping install");
    } else {
        let flags = InstallFlags {
            ignore_scripts: ctx.config.cross_platform,
            production: ctx.config.production,
        };
        tracing::info!(?flags, "Installing dependencies");
        ctx.npm.install(ctx.working_dir, flags).await?;
    }
    if ctx.config.cross_platform {
        run_lifecycle(ctx, manifest, LifecycleScript::Postinstall).await?;
    }

    // 6-7. Stage, then rebuild natives (which stages the ignore-file)
    ctx.vcs.add_all(deps).await?;
    if ctx.config.cross_platform {
        rebuild_native(ctx).await?;
    }

    // 8-9. Commit only when something changed
    let status = ctx.vcs.status(deps).await?;
    let committed = status.has_changes();
    if committed {
        let npm_version = ctx.npm.version(ctx.working_dir).await?;
        let message = commit_message(manifest, &npm_version);
        tracing::info!(%message, "Committing dependency tree");
        ctx.vcs.commit_all(deps, &message).await?;
    } else {
        tracing::info!("Dependency tree unchanged, skipping commit");
    }

    // 10. Tag and push
    if !ctx.vcs.rev_exists(deps, "HEAD").await? {
        tracing::warn!("Nothing installed and nothing committed yet; skipping tag and push");
        return Ok(PublishReport { committed, tag: None });
    }

    let tag = ctx.vcs.tag(deps, fingerprint.as_str()).await?;
    if tag == TagOutcome::AlreadyExists {
        tracing::info!(%fingerprint, "Tag already present");
    }
    tracing::info!(repo = ctx.repo_url, branch, "Pushing dependency tree");
    ctx.vcs.push(deps, ctx.repo_url, branch).await?;

    Ok(PublishReport {
        committed,
        tag: Some(tag),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_message_embeds_versions() {
        let manifest =
            Manifest::parse(r#"{"name": "app", "version": "1.0.0"}"#).unwrap();
        assert_eq!(
            commit_message(&manifest, "10.2.4"),
            "depsync: installed app@1.0.0 with npm 10.2.4"
        );
    }

    #[test]
    fn commit_message_without_name() {
        let manifest = Manifest::parse(r#"{"version": "2.3.4"}"#).unwrap();
        assert_eq!(
            commit_message(&manifest, "9.0.0"),
            "depsync: installed 2.3.4 with npm 9.0.0"
        );
    }
}
