//! The project's dependency manifest (`package.json`)

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// The parts of `package.json` depsync reads. Everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,

    /// Free-form version string; only used in commit messages
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,

    /// Named lifecycle scripts (`preinstall`, `postinstall`, ...)
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

impl Manifest {
    /// Parse manifest JSON.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = depsync_fs::io::read_text(path).map_err(|e| {
            if e.is_not_found() {
                Error::ManifestNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Fs(e)
            }
        })?;

        Self::parse(&content).map_err(|e| Error::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn has_script(&self, script: &str) -> bool {
        self.scripts.contains_key(script)
    }

    /// Version for commit messages; `0.0.0` when undeclared.
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or("0.0.0")
    }

    /// `name@version`, or just the version when the manifest has no name.
    pub fn display_id(&self) -> String {
        match &self.name {
            Some(name) => format!("{name}@{}", self.version_or_default()),
            None => self.version_or_default().to_string(),
        }
    }
}
