//! Planning platform-specific rebuilds
//!
//! `npm rebuild` is invoked with explicit package names. Long dependency
//! trees would overflow the shell's command-line limit, so names are split
//! into [`PackageGroup`]s. Packages that only build on one platform are left
//! out entirely on other hosts: npm does not reliably treat their failures
//! as optional.

use std::fmt;

/// Longest command line accepted by the most restrictive supported shell
/// (`cmd.exe`).
pub const MAX_COMMAND_LENGTH: usize = 8191;

/// Packages that can only be built on a single platform.
const PLATFORM_ONLY: &[(&str, &str)] = &[("fsevents", "darwin")];

/// The platform required to build `package`, if it is restricted.
pub fn required_platform(package: &str) -> Option<&'static str> {
    PLATFORM_ONLY
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, platform)| *platform)
}

/// Host platform in npm's `process.platform` vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform(String);

impl Platform {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The platform this process runs on.
    pub fn current() -> Self {
        let name = match std::env::consts::OS {
            "macos" => "darwin",
            "windows" => "win32",
            other => other,
        };
        Self::new(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `package` may be built on this platform.
    pub fn can_build(&self, package: &str) -> bool {
        required_platform(package).is_none_or(|required| required == self.0)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A batch of package names rebuilt by a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageGroup {
    pub packages: Vec<String>,
}

impl PackageGroup {
    /// Length of the full command line given a fixed per-invocation prefix.
    pub fn command_length(&self, overhead: usize) -> usize {
        overhead + names_length(&self.packages)
    }
}

/// Length the names occupy on a command line, one separating space each.
fn names_length(names: &[String]) -> usize {
    names.iter().map(|n| n.len() + 1).sum()
}

/// Split `names` (sorted first) into groups whose command lines stay under
/// `ceiling` once `overhead` is added.
///
/// A single name too long to fit anywhere still gets a group of its own.
pub fn group_packages(names: &[String], overhead: usize, ceiling: usize) -> Vec<PackageGroup> {
    let mut sorted = names.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut groups = Vec::new();
    let mut current = PackageGroup::default();
    let mut length = overhead;

    for name in sorted {
        let cost = name.len() + 1;
        if !current.packages.is_empty() && length + cost >= ceiling {
            groups.push(std::mem::take(&mut current));
            length = overhead;
        }
        if overhead + cost >= ceiling {
            tracing::warn!(package = %name, "Package name alone exceeds the command-length ceiling");
        }
        length += cost;
        current.packages.push(name);
    }

    if !current.packages.is_empty() {
        groups.push(current);
    }
    groups
}

/// What a platform-specific rebuild will do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildPlan {
    /// Groups to rebuild, in order
    pub groups: Vec<PackageGroup>,
    /// Packages left out, with the platform they require
    pub skipped: Vec<(String, &'static str)>,
}

/// Plan the rebuild of `installed` on `host` for a package manager invoked as
/// `program`.
pub fn plan_rebuild(installed: &[String], host: &Platform, program: &str) -> RebuildPlan {
    let mut skipped = Vec::new();
    let buildable: Vec<String> = installed
        .iter()
        .filter(|name| {
            if host.can_build(name) {
                return true;
            }
            if let Some(required) = required_platform(name) {
                tracing::warn!(package = %name, required, host = %host, "Skipping rebuild of platform-specific package");
                skipped.push(((*name).clone(), required));
            }
            false
        })
        .cloned()
        .collect();

    let overhead = format!("{program} rebuild ").len();
    RebuildPlan {
        groups: group_packages(&buildable, overhead, MAX_COMMAND_LENGTH),
        skipped,
    }
}
