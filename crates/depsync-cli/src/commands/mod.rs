//! Command implementations for depsync-cli

pub mod fingerprint;
pub mod sync;

use std::path::{Path, PathBuf};

pub use fingerprint::run_fingerprint;
pub use sync::run_sync;

use crate::error::{CliError, Result};

/// The project directory to operate on: `dir` if given, else the current
/// directory, canonicalized.
pub fn resolve_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let path = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    dunce::canonicalize(&path).map_err(|e| {
        CliError::user(format!("Cannot use directory {}: {e}", path.display()))
    })
}
