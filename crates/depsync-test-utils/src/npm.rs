//! [`FakeNpm`]: a deterministic [`PackageManager`] for sync tests.
//!
//! `install` materialises one directory per declared dependency under
//! `node_modules`, `rebuild` can leave native build outputs behind, and every
//! call is recorded.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use depsync_npm::{Error, InstallFlags, PackageManager, Result};
use serde_json::Value;

/// Version reported by [`FakeNpm::version`].
pub const FAKE_NPM_VERSION: &str = "10.2.4";

/// Build output written by a rebuild of a native package, relative to the
/// package directory.
pub const NATIVE_OUTPUT: &str = "build/Release/addon.node";

/// One recorded package-manager call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpmCall {
    Install(InstallFlags),
    Rebuild(Vec<String>),
    RunScript(String),
    Version,
}

/// In-process stand-in for npm.
#[derive(Default)]
pub struct FakeNpm {
    calls: Mutex<Vec<NpmCall>>,
    native: BTreeSet<String>,
    failing_install: bool,
    failing_rebuild: bool,
}

impl FakeNpm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `package` as native: rebuilding it writes [`NATIVE_OUTPUT`].
    pub fn with_native(mut self, package: &str) -> Self {
        self.native.insert(package.to_string());
        self
    }

    /// Make every install fail with exit code 1.
    pub fn with_failing_install(mut self) -> Self {
        self.failing_install = true;
        self
    }

    /// Make every rebuild fail with exit code 1 after it is recorded.
    pub fn with_failing_rebuild(mut self) -> Self {
        self.failing_rebuild = true;
        self
    }

    pub fn calls(&self) -> Vec<NpmCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn install_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, NpmCall::Install(_)))
            .count()
    }

    /// Every package passed to `rebuild`, across all invocations.
    pub fn rebuilt(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                NpmCall::Rebuild(names) => Some(names),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Names of scripts run, in order.
    pub fn scripts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                NpmCall::RunScript(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: NpmCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn io_failure(command: &str, e: std::io::Error) -> Error {
    Error::CommandFailed {
        command: command.to_string(),
        code: Some(1),
        output: e.to_string(),
    }
}

/// Declared dependency names and versions from one manifest section.
fn section(manifest: &Value, key: &str) -> Vec<(String, String)> {
    manifest
        .get(key)
        .and_then(Value::as_object)
        .map(|deps| {
            deps.iter()
                .map(|(name, version)| {
                    (name.clone(), version.as_str().unwrap_or("*").to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

fn write_package(modules: &Path, name: &str, version: &str) -> std::io::Result<()> {
    let dir = modules.join(name);
    fs::create_dir_all(&dir)?;
    let manifest = serde_json::json!({ "name": name, "version": version.trim_start_matches('^') });
    fs::write(dir.join("package.json"), format!("{manifest:#}\n"))?;
    fs::write(dir.join("index.js"), format!("module.exports = {name:?};\n"))
}

#[async_trait]
impl PackageManager for FakeNpm {
    fn program(&self) -> &str {
        "npm"
    }

    async fn install(&self, dir: &Path, flags: InstallFlags) -> Result<()> {
        self.record(NpmCall::Install(flags));
        let command = format!("npm install {}", flags.args().join(" "));
        if self.failing_install {
            return Err(Error::CommandFailed {
                command,
                code: Some(1),
                output: "npm ERR! code E404".to_string(),
            });
        }

        let text = fs::read_to_string(dir.join("package.json"))
            .map_err(|e| io_failure(&command, e))?;
        let manifest: Value = serde_json::from_str(&text).map_err(|e| Error::CommandFailed {
            command: command.clone(),
            code: Some(1),
            output: e.to_string(),
        })?;

        let mut packages = section(&manifest, "dependencies");
        if !flags.production {
            packages.extend(section(&manifest, "devDependencies"));
        }

        let modules = dir.join("node_modules");
        for (name, version) in packages {
            write_package(&modules, &name, &version).map_err(|e| io_failure(&command, e))?;
        }
        Ok(())
    }

    async fn rebuild(&self, dir: &Path, packages: &[String]) -> Result<()> {
        self.record(NpmCall::Rebuild(packages.to_vec()));
        if self.failing_rebuild {
            return Err(Error::CommandFailed {
                command: format!("npm rebuild {}", packages.join(" ")),
                code: Some(1),
                output: "gyp ERR! build error".to_string(),
            });
        }
        let modules = dir.join("node_modules");
        for name in packages.iter().filter(|p| self.native.contains(*p)) {
            let output = modules.join(name).join(NATIVE_OUTPUT);
            let written = output
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| fs::write(&output, b"\x7fELF"));
            written.map_err(|e| io_failure("npm rebuild", e))?;
        }
        Ok(())
    }

    async fn run_script(&self, _dir: &Path, script: &str) -> Result<()> {
        self.record(NpmCall::RunScript(script.to_string()));
        Ok(())
    }

    async fn version(&self, _dir: &Path) -> Result<String> {
        self.record(NpmCall::Version);
        Ok(FAKE_NPM_VERSION.to_string())
    }
}
