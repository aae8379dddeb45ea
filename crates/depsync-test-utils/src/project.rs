//! [`TestProject`]: a project directory with a manifest and an empty bare
//! dependency repository beside it.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git::init_bare_remote;

/// Manifest with one runtime and one development dependency.
pub const BASIC_MANIFEST: &str = r#"{
  "name": "app",
  "version": "1.0.0",
  "dependencies": { "left-pad": "^1.3.0" },
  "devDependencies": { "mocha": "^10.0.0" }
}
"#;

/// A temporary layout of `project/` (the working directory) and
/// `deps.git/` (the bare dependency repository).
///
/// # Example
///
/// ```rust,no_run
/// use depsync_test_utils::project::{BASIC_MANIFEST, TestProject};
///
/// let project = TestProject::new(BASIC_MANIFEST);
/// project.assert_file_exists("package.json");
/// let url = project.remote_url();
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    remote_url: String,
}

impl TestProject {
    /// Create the layout and write `manifest` as `project/package.json`.
    pub fn new(manifest: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let remote_url = init_bare_remote(&temp_dir.path().join("deps.git"));
        let project = Self {
            temp_dir,
            remote_url,
        };
        fs::create_dir_all(project.root()).unwrap();
        project.write_manifest(manifest);
        project
    }

    /// The project working directory.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("project")
    }

    /// `node_modules` inside the working directory.
    pub fn deps_dir(&self) -> PathBuf {
        self.root().join("node_modules")
    }

    /// Path of the bare dependency repository.
    pub fn remote_path(&self) -> PathBuf {
        self.temp_dir.path().join("deps.git")
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    /// Replace the project manifest.
    pub fn write_manifest(&self, manifest: &str) {
        fs::write(self.root().join("package.json"), manifest).unwrap();
    }

    /// Create another working directory `name` next to the project, sharing
    /// the same dependency repository, and return its path.
    pub fn sibling(&self, name: &str, manifest: &str) -> PathBuf {
        let dir = self.temp_dir.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), manifest).unwrap();
        dir
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root().join(path)
    }

    /// Assert that `path` (relative to the working directory) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.resolve(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the working directory) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.resolve(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.resolve(path);
        let file_content = read(&full_path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
}
