//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use depsync_core::ConfigLayer;

/// depsync - Keep node_modules in a git repository, tagged by dependency set
#[derive(Parser, Debug)]
#[command(name = "depsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding package.json (defaults to the current directory)
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub sync: SyncArgs,

    /// The command to run (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for a sync run. Flags left off defer to `.depsync.toml`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// URL of the dependency repository
    #[arg(long, env = "DEPSYNC_REPO", global = true, value_name = "URL")]
    pub repo: Option<String>,

    /// Branch published trees are committed to
    #[arg(long, env = "DEPSYNC_BRANCH", global = true, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Package-manager executable
    #[arg(long, env = "DEPSYNC_NPM", global = true, value_name = "PROGRAM")]
    pub npm: Option<String>,

    /// Install with scripts disabled, then rebuild native modules for this host only
    #[arg(long, global = true)]
    pub cross_platform: bool,

    /// Install on top of the previous tree instead of a clean directory
    #[arg(long, global = true)]
    pub incremental_install: bool,

    /// Install production dependencies only
    #[arg(long, global = true)]
    pub production: bool,

    /// Publish node_modules as it is, without installing
    #[arg(long, global = true)]
    pub skip_install: bool,
}

impl SyncArgs {
    /// The command-line configuration layer.
    pub fn layer(&self, verbose: bool) -> ConfigLayer {
        ConfigLayer {
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            npm: self.npm.clone(),
            cross_platform: self.cross_platform.then_some(true),
            incremental_install: self.incremental_install.then_some(true),
            production: self.production.then_some(true),
            skip_install: self.skip_install.then_some(true),
            verbose: verbose.then_some(true),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Bring node_modules in line with package.json through the dependency repository
    Sync,

    /// Print the dependency fingerprint of package.json
    ///
    /// Reads only the manifest; no repository is touched.
    Fingerprint,
}
