//! Reuse Path
//!
//! Check out a previously published tree for the fingerprint instead of
//! installing. Reuse is an optimization: every failure falls through to a
//! fresh install rather than aborting the run. The fallthrough reason keeps
//! "no such tag" apart from "a step failed" so that flaky environments show
//! up in the logs as such.

use std::fmt;

use crate::context::SyncContext;
use crate::fingerprint::Fingerprint;
use crate::hooks::{LifecycleScript, run_lifecycle};
use crate::manifest::Manifest;
use crate::native::rebuild_native;
use crate::Error;

/// Why the reuse path gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallthroughReason {
    /// The fingerprint tag is not in the repository's history
    TagMissing,
    /// The tag exists but a step of the checkout failed
    StepFailed { step: &'static str, error: String },
}

impl fmt::Display for FallthroughReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagMissing => write!(f, "no published tree for this fingerprint"),
            Self::StepFailed { step, error } => write!(f, "{step} failed: {error}"),
        }
    }
}

/// Result of a reuse attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReuseOutcome {
    Reused,
    Fallthrough(FallthroughReason),
}

/// Try to satisfy the manifest from the published tag.
pub async fn try_reuse(
    ctx: &SyncContext<'_>,
    manifest: &Manifest,
    fingerprint: &Fingerprint,
) -> ReuseOutcome {
    let deps = ctx.deps_dir.as_path();

    match ctx.vcs.rev_exists(deps, fingerprint.as_str()).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!(%fingerprint, "No published tree for fingerprint");
            return ReuseOutcome::Fallthrough(FallthroughReason::TagMissing);
        }
        Err(e) => return fallthrough("tag lookup", e.into()),
    }

    tracing::info!(%fingerprint, "Reusing published dependency tree");

    if let Err(e) = run_lifecycle(ctx, manifest, LifecycleScript::Preinstall).await {
        return fallthrough("preinstall", e);
    }
    if let Err(e) = ctx.vcs.checkout(deps, fingerprint.as_str()).await {
        return fallthrough("checkout", e.into());
    }
    if let Err(e) = ctx.vcs.clean(deps).await {
        return fallthrough("clean", e.into());
    }
    // native outputs are never portable, even for an unchanged dependency set
    if ctx.config.cross_platform
        && let Err(e) = rebuild_native(ctx).await
    {
        return fallthrough("native rebuild", e);
    }
    if let Err(e) = run_lifecycle(ctx, manifest, LifecycleScript::Postinstall).await {
        return fallthrough("postinstall", e);
    }

    ReuseOutcome::Reused
}

fn fallthrough(step: &'static str, error: Error) -> ReuseOutcome {
    tracing::warn!(step, error = %error, "Reuse failed, falling back to a fresh install");
    ReuseOutcome::Fallthrough(FallthroughReason::StepFailed {
        step,
        error: error.to_string(),
    })
}
