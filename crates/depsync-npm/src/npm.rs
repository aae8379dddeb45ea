//! npm implementation of the package-manager interface

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Error, Result};

/// Flags for `install`, derived from the sync options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallFlags {
    /// Suppress lifecycle scripts (native builds happen in an explicit rebuild)
    pub ignore_scripts: bool,
    /// Install production dependencies only
    pub production: bool,
}

impl InstallFlags {
    /// Command-line arguments following `install`.
    pub fn args(&self) -> Vec<&'static str> {
        let mut args = Vec::new();
        if self.ignore_scripts {
            args.push("--ignore-scripts");
        }
        if self.production {
            args.push("--production");
        }
        args
    }
}

/// Operations the synchronizer needs from a package manager.
///
/// `dir` is always the project working directory (the one holding the
/// manifest), never the dependency directory itself.
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Executable name, used to size rebuild command lines.
    fn program(&self) -> &str;

    async fn install(&self, dir: &Path, flags: InstallFlags) -> Result<()>;

    /// Rebuild the named packages in one invocation.
    async fn rebuild(&self, dir: &Path, packages: &[String]) -> Result<()>;

    /// Run a named manifest script (`run <script>`).
    async fn run_script(&self, dir: &Path, script: &str) -> Result<()>;

    /// The package manager's own version string.
    async fn version(&self, dir: &Path) -> Result<String>;
}

/// Drives the `npm` executable.
#[derive(Debug, Clone)]
pub struct Npm {
    program: String,
}

impl Default for Npm {
    fn default() -> Self {
        Self::new()
    }
}

impl Npm {
    /// Use `npm` from `PATH` (`npm.cmd` on Windows).
    pub fn new() -> Self {
        let program = if cfg!(windows) { "npm.cmd" } else { "npm" };
        Self::with_program(program)
    }

    /// Use a specific npm executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run npm, returning stdout on success.
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let command = std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(dir = %dir.display(), %command, "Running package manager");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            tracing::debug!(%command, output = %stdout.trim(), "Package manager finished");
            return Ok(stdout);
        }

        let code = output.status.code();
        let captured = format!("{}\n{}", stdout.trim(), stderr.trim())
            .trim()
            .to_string();
        tracing::error!(%command, ?code, output = %captured, "Package manager command failed");
        Err(Error::CommandFailed {
            command,
            code,
            output: captured,
        })
    }
}

#[async_trait]
impl PackageManager for Npm {
    fn program(&self) -> &str {
        &self.program
    }

    async fn install(&self, dir: &Path, flags: InstallFlags) -> Result<()> {
        let mut args = vec!["install"];
        args.extend(flags.args());
        self.run(dir, &args).await?;
        Ok(())
    }

    async fn rebuild(&self, dir: &Path, packages: &[String]) -> Result<()> {
        let mut args = vec!["rebuild"];
        args.extend(packages.iter().map(String::as_str));
        self.run(dir, &args).await?;
        Ok(())
    }

    async fn run_script(&self, dir: &Path, script: &str) -> Result<()> {
        self.run(dir, &["run", script]).await?;
        Ok(())
    }

    async fn version(&self, dir: &Path) -> Result<String> {
        let stdout = self.run(dir, &["--version"]).await?;
        Ok(stdout.trim().to_string())
    }
}
