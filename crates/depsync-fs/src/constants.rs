//! Well-known file and directory names.

use std::path::Path;

/// Fixed names depsync reads or writes relative to a working directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPath {
    /// The dependency manifest (`package.json`)
    Manifest,
    /// The installed dependency tree, which doubles as the secondary repository
    Dependencies,
    /// Git metadata inside the dependency directory
    GitDir,
    /// Ignore-file inside the dependency directory
    IgnoreFile,
    /// Optional per-project configuration
    ConfigFile,
}

impl SyncPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "package.json",
            Self::Dependencies => "node_modules",
            Self::GitDir => ".git",
            Self::IgnoreFile => ".gitignore",
            Self::ConfigFile => ".depsync.toml",
        }
    }
}

impl AsRef<Path> for SyncPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SyncPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SyncPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
