//! Exclusive per-directory run lock
//!
//! Two depsync runs against the same working directory would race on the
//! dependency repository. The lock lives in the OS temp directory so that it
//! never shows up in the project tree or the secondary repository.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Held for the duration of a run; released on drop.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock for `working_dir` without blocking.
    ///
    /// Fails with [`Error::Locked`] if another process holds it.
    pub fn acquire(working_dir: &Path) -> Result<Self> {
        let path = Self::lock_path(working_dir)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        file.try_lock_exclusive().map_err(|e| lock_error(working_dir, &path, e))?;

        tracing::debug!(lock = %path.display(), "Acquired run lock");
        Ok(Self { file, path })
    }

    /// Location of the lock file for a working directory.
    ///
    /// The directory is canonicalized first so that different spellings of the
    /// same path share one lock.
    pub fn lock_path(working_dir: &Path) -> Result<PathBuf> {
        let canonical =
            dunce::canonicalize(working_dir).map_err(|e| Error::io(working_dir, e))?;

        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string_lossy().as_bytes());
        let digest = format!("{:x}", hasher.finalize());

        Ok(std::env::temp_dir().join(format!("depsync-{}.lock", &digest[..16])))
    }

    /// Path of the held lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Only contention means another run holds the lock; anything else is I/O.
fn lock_error(working_dir: &Path, lock: &Path, e: std::io::Error) -> Error {
    if e.kind() == fs2::lock_contended_error().kind() {
        Error::Locked {
            dir: working_dir.to_path_buf(),
            lock: lock.to_path_buf(),
        }
    } else {
        Error::io(lock, e)
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(lock = %self.path.display(), error = %e, "Failed to release run lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;

    #[rstest]
    #[case(fs2::lock_contended_error(), true)]
    #[case(io::Error::from(io::ErrorKind::PermissionDenied), false)]
    #[case(io::Error::other("unsupported"), false)]
    fn only_contention_is_reported_as_locked(#[case] source: io::Error, #[case] locked: bool) {
        let err = lock_error(Path::new("/work"), Path::new("/tmp/depsync.lock"), source);
        assert_eq!(matches!(err, Error::Locked { .. }), locked, "got: {err:?}");
        assert_eq!(matches!(err, Error::Io { .. }), !locked, "got: {err:?}");
    }
}
