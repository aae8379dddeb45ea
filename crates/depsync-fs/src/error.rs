//! Error types for depsync-fs

use std::path::PathBuf;

/// Result type for depsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in depsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Another depsync run holds the lock for {dir} (lock file {lock})")]
    Locked { dir: PathBuf, lock: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying I/O error is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
