//! Manifest lifecycle scripts
//!
//! depsync runs `preinstall` and `postinstall` itself whenever it bypasses
//! npm's own script handling: when reusing a committed tree (npm never runs)
//! and in cross-platform mode (npm runs with `--ignore-scripts`).

use std::fmt;

use crate::context::SyncContext;
use crate::manifest::Manifest;
use crate::Result;

/// Lifecycle scripts run around an install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleScript {
    Preinstall,
    Postinstall,
}

impl LifecycleScript {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preinstall => "preinstall",
            Self::Postinstall => "postinstall",
        }
    }
}

impl fmt::Display for LifecycleScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run `script` through the package manager if the manifest declares it.
///
/// Returns whether the script ran.
pub async fn run_lifecycle(
    ctx: &SyncContext<'_>,
    manifest: &Manifest,
    script: LifecycleScript,
) -> Result<bool> {
    if !manifest.has_script(script.as_str()) {
        tracing::debug!(%script, "No lifecycle script declared");
        return Ok(false);
    }

    tracing::info!(%script, "Running lifecycle script");
    ctx.npm.run_script(ctx.working_dir, script.as_str()).await?;
    Ok(true)
}
