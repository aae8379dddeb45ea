//! The fingerprint command

use std::path::Path;

use depsync_core::{Fingerprint, Manifest};
use depsync_fs::SyncPath;

use crate::error::Result;

/// Print the fingerprint of the manifest in `dir`, alone on stdout.
pub fn run_fingerprint(dir: &Path) -> Result<()> {
    let manifest = Manifest::load(&dir.join(SyncPath::Manifest))?;
    let fingerprint = Fingerprint::compute(&manifest);
    tracing::debug!(
        dependencies = manifest.dependencies.len(),
        dev_dependencies = manifest.dev_dependencies.len(),
        "Computed fingerprint"
    );
    println!("{fingerprint}");
    Ok(())
}
