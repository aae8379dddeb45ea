//! Error types for depsync-git

/// Result type for depsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in depsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Unrecognized status line: {line:?}")]
    StatusParse { line: String },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}
