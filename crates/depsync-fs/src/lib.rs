//! Filesystem layer for depsync
//!
//! Everything that touches the host filesystem directly: reading the manifest
//! and ignore-file, wiping the dependency directory, enumerating installed
//! packages and holding the per-directory run lock.

pub mod constants;
pub mod error;
pub mod io;
pub mod lock;

pub use constants::SyncPath;
pub use error::{Error, Result};
pub use lock::RunLock;
