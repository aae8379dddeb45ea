//! Error types for depsync-npm

/// Result type for depsync-npm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the package manager
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The package-manager executable could not be started
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The package manager ran but reported failure
    #[error("`{command}` failed (exit code {code:?})")]
    CommandFailed {
        /// The command that was run, e.g. `npm install --ignore-scripts`
        command: String,
        /// Completion code, `None` if killed by a signal
        code: Option<i32>,
        /// Captured stdout and stderr
        output: String,
    },
}

impl Error {
    /// Completion code of a failed command, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { code, .. } => *code,
            Self::Spawn { .. } => None,
        }
    }
}
