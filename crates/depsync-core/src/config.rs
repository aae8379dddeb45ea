//! Layered sync configuration
//!
//! Defaults, then `.depsync.toml` in the working directory, then command-line
//! flags. Each layer is a [`ConfigLayer`] whose set fields override the ones
//! below it.

use std::path::Path;

use depsync_fs::SyncPath;
use serde::Deserialize;

use crate::{Error, Result};

/// One layer of configuration; unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub npm: Option<String>,
    pub cross_platform: Option<bool>,
    pub incremental_install: Option<bool>,
    pub production: Option<bool>,
    pub skip_install: Option<bool>,
    pub verbose: Option<bool>,
}

impl ConfigLayer {
    /// Load `.depsync.toml` from `working_dir`; an absent file is an empty layer.
    pub fn load(working_dir: &Path) -> Result<Self> {
        let path = working_dir.join(SyncPath::ConfigFile);
        match depsync_fs::io::read_optional_text(&path)? {
            Some(content) => toml::from_str(&content).map_err(|e| Error::Config {
                path,
                message: e.to_string(),
            }),
            None => Ok(Self::default()),
        }
    }
}

/// Effective configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// URL of the dependency repository
    pub repo: Option<String>,
    /// Mainline branch commits are published to
    pub branch: String,
    /// Package-manager executable
    pub npm: String,
    /// Defer native builds to an explicit, platform-filtered rebuild
    pub cross_platform: bool,
    /// Keep the previous dependency tree as the install starting point
    pub incremental_install: bool,
    /// Install production dependencies only
    pub production: bool,
    /// Publish whatever is in the dependency directory without installing
    pub skip_install: bool,
    pub verbose: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repo: None,
            branch: "master".to_string(),
            npm: if cfg!(windows) { "npm.cmd" } else { "npm" }.to_string(),
            cross_platform: false,
            incremental_install: false,
            production: false,
            skip_install: false,
            verbose: false,
        }
    }
}

impl SyncConfig {
    /// Defaults overlaid with the working directory's config file.
    pub fn load(working_dir: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.apply(ConfigLayer::load(working_dir)?);
        Ok(config)
    }

    /// Overlay a layer on top of the current values.
    pub fn apply(&mut self, layer: ConfigLayer) {
        if let Some(repo) = layer.repo {
            self.repo = Some(repo);
        }
        if let Some(branch) = layer.branch {
            self.branch = branch;
        }
        if let Some(npm) = layer.npm {
            self.npm = npm;
        }
        if let Some(v) = layer.cross_platform {
            self.cross_platform = v;
        }
        if let Some(v) = layer.incremental_install {
            self.incremental_install = v;
        }
        if let Some(v) = layer.production {
            self.production = v;
        }
        if let Some(v) = layer.skip_install {
            self.skip_install = v;
        }
        if let Some(v) = layer.verbose {
            self.verbose = v;
        }
    }

    /// The repository URL, which every sync requires.
    pub fn repo_url(&self) -> Result<&str> {
        self.repo
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(Error::MissingRepository)
    }
}
