//! Error types for depsync-core

use std::path::PathBuf;

/// Result type for depsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a sync run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest file not found at expected path
    #[error("Manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// Manifest exists but is not a valid package manifest
    #[error("Failed to parse manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Configuration file could not be parsed
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// No repository URL was configured
    #[error("No dependency repository configured. Pass --repo <url> or set `repo` in .depsync.toml")]
    MissingRepository,

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from depsync-fs
    #[error(transparent)]
    Fs(#[from] depsync_fs::Error),

    /// VCS error from depsync-git
    #[error(transparent)]
    Git(#[from] depsync_git::Error),

    /// Package-manager error from depsync-npm
    #[error(transparent)]
    Npm(#[from] depsync_npm::Error),
}
