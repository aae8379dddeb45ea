//! Real git fixtures: bare remotes, a committing identity, and remote-side
//! inspection through `git2`.
//!
//! Every helper panics on failure; these are for tests only.

use std::path::Path;
use std::process::Command;

use depsync_git::GitCli;

const IDENTITY: [(&str, &str); 9] = [
    ("GIT_AUTHOR_NAME", "Depsync Test"),
    ("GIT_AUTHOR_EMAIL", "depsync@test.invalid"),
    ("GIT_COMMITTER_NAME", "Depsync Test"),
    ("GIT_COMMITTER_EMAIL", "depsync@test.invalid"),
    ("GIT_CONFIG_COUNT", "2"),
    ("GIT_CONFIG_KEY_0", "commit.gpgsign"),
    ("GIT_CONFIG_VALUE_0", "false"),
    ("GIT_CONFIG_KEY_1", "tag.gpgsign"),
    ("GIT_CONFIG_VALUE_1", "false"),
];

/// Mainline branch used by the fixtures.
pub const DEFAULT_BRANCH: &str = "master";

/// A [`GitCli`] that can commit on machines without a configured identity
/// and never prompts for signing.
pub fn identity_git() -> GitCli {
    IDENTITY.into_iter().fold(GitCli::new(), |git, (key, value)| git.with_env(key, value))
}

/// Run `git <args>` in `dir` with the test identity, returning stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits non-zero.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(IDENTITY)
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Initialise an empty bare repository at `path` and return its URL.
///
/// HEAD points at [`DEFAULT_BRANCH`] regardless of the machine's
/// `init.defaultBranch`, so clones check out the published mainline.
///
/// The URL is the plain filesystem path, which git accepts for clone, fetch
/// and push alike.
pub fn init_bare_remote(path: &Path) -> String {
    let mut options = git2::RepositoryInitOptions::new();
    options.bare(true).initial_head(DEFAULT_BRANCH);
    git2::Repository::init_opts(path, &options).unwrap_or_else(|e| {
        panic!(
            "init_bare_remote: failed to init bare repository at {}: {e}",
            path.display()
        )
    });
    path.to_string_lossy().into_owned()
}

fn open(path: &Path) -> git2::Repository {
    git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("failed to open repository at {}: {e}", path.display()))
}

/// Names of all tags in the repository at `path`, sorted.
pub fn remote_tags(path: &Path) -> Vec<String> {
    let repo = open(path);
    let names = repo
        .tag_names(None)
        .unwrap_or_else(|e| panic!("remote_tags: failed to list tags: {e}"));
    let mut tags: Vec<String> = names.iter().flatten().map(String::from).collect();
    tags.sort();
    tags
}

/// Number of commits reachable from `branch`; zero if the branch is missing.
pub fn remote_commit_count(path: &Path, branch: &str) -> usize {
    let repo = open(path);
    let Ok(reference) = repo.find_reference(&format!("refs/heads/{branch}")) else {
        return 0;
    };
    let Some(oid) = reference.target() else {
        return 0;
    };
    let mut walk = repo
        .revwalk()
        .unwrap_or_else(|e| panic!("remote_commit_count: revwalk failed: {e}"));
    walk.push(oid)
        .unwrap_or_else(|e| panic!("remote_commit_count: push failed: {e}"));
    walk.count()
}

/// Message of the commit at the tip of `branch`.
///
/// # Panics
/// Panics if the branch does not exist.
pub fn remote_head_message(path: &Path, branch: &str) -> String {
    let repo = open(path);
    let commit = repo
        .find_reference(&format!("refs/heads/{branch}"))
        .and_then(|r| r.peel_to_commit())
        .unwrap_or_else(|e| panic!("remote_head_message: no branch {branch}: {e}"));
    commit.message().unwrap_or_default().trim().to_string()
}

/// Whether the tree at the tip of `branch` contains `file` (slash-separated).
pub fn remote_branch_has_path(path: &Path, branch: &str, file: &str) -> bool {
    let repo = open(path);
    let Ok(commit) = repo
        .find_reference(&format!("refs/heads/{branch}"))
        .and_then(|r| r.peel_to_commit())
    else {
        return false;
    };
    let tree = commit
        .tree()
        .unwrap_or_else(|e| panic!("remote_branch_has_path: no tree: {e}"));
    tree.get_path(Path::new(file)).is_ok()
}

/// Commit id the tag `name` points at, if it exists.
pub fn remote_tag_target(path: &Path, name: &str) -> Option<String> {
    let repo = open(path);
    let reference = repo.find_reference(&format!("refs/tags/{name}")).ok()?;
    let commit = reference.peel_to_commit().ok()?;
    Some(commit.id().to_string())
}

/// Commit id at the tip of `branch`, if it exists.
pub fn remote_branch_target(path: &Path, branch: &str) -> Option<String> {
    let repo = open(path);
    let reference = repo.find_reference(&format!("refs/heads/{branch}")).ok()?;
    let commit = reference.peel_to_commit().ok()?;
    Some(commit.id().to_string())
}
