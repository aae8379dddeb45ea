//! Spawning `git` with an explicit working directory

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::{Error, Result};

/// Captured result of a finished git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Git implementation of [`crate::Vcs`], driving the `git` binary.
///
/// Every call names its working directory explicitly; the process current
/// directory is never consulted or changed.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    envs: Vec<(String, String)>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            envs: Vec::new(),
        }
    }

    /// Use a specific git executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set an environment variable on every spawned git process.
    ///
    /// Typically used for `GIT_AUTHOR_NAME` and friends on machines without a
    /// configured identity.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Render an invocation for logs and error messages.
    pub fn describe(&self, args: &[&str]) -> String {
        let mut rendered = self.program.clone();
        for arg in args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }

    /// Run git and capture its output regardless of exit status.
    pub async fn output(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        let command = self.describe(args);
        tracing::debug!(dir = %dir.display(), %command, "Running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        let result = GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(%command, code = ?result.code, stdout = %result.stdout.trim(), stderr = %result.stderr.trim(), "git finished");
        Ok(result)
    }

    /// Run git and return stdout, treating a non-zero exit as an error.
    pub async fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.output(dir, args).await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(self.failure(args, output))
        }
    }

    /// Build (and log) the error for a failed invocation.
    pub(crate) fn failure(&self, args: &[&str], output: GitOutput) -> Error {
        let command = self.describe(args);
        tracing::error!(
            %command,
            code = ?output.code,
            stdout = %output.stdout.trim(),
            stderr = %output.stderr.trim(),
            "git command failed"
        );
        Error::CommandFailed {
            command,
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        }
    }
}
