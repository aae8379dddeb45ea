//! [`RecordingVcs`]: a [`Vcs`] decorator that records every operation and
//! can make chosen operations fail.
//!
//! Wraps a real implementation (normally [`GitCli`](depsync_git::GitCli)),
//! so tests observe the exact command sequence while still exercising real
//! repositories.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use depsync_git::{Error, Remote, Result, StatusSummary, TagOutcome, Vcs};

/// Operations that change a repository or its remote.
const MUTATING: &[&str] = &[
    "clone",
    "fetch_tags",
    "checkout",
    "create_branch",
    "clean",
    "stash",
    "pull",
    "add_all",
    "add",
    "commit_all",
    "tag",
    "push",
];

/// One recorded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsCall {
    /// Operation name, e.g. `"checkout"`
    pub op: &'static str,
    /// Main argument (reference, path, message...), empty when there is none
    pub detail: String,
}

impl VcsCall {
    pub fn is_mutating(&self) -> bool {
        MUTATING.contains(&self.op)
    }
}

#[derive(Debug, Clone, Copy)]
enum Injection {
    Once,
    Always,
}

/// Recording decorator around another [`Vcs`].
pub struct RecordingVcs<V> {
    inner: V,
    calls: Mutex<Vec<VcsCall>>,
    failures: Mutex<HashMap<&'static str, Injection>>,
}

impl<V: Vcs> RecordingVcs<V> {
    pub fn new(inner: V) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Make the next call of `op` fail as if the network dropped.
    pub fn fail_once(&self, op: &'static str) {
        self.failures.lock().unwrap().insert(op, Injection::Once);
    }

    /// Make every call of `op` fail.
    pub fn fail_always(&self, op: &'static str) {
        self.failures.lock().unwrap().insert(op, Injection::Always);
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Names of every recorded operation, in order.
    pub fn ops(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|c| c.op).collect()
    }

    /// Recorded calls that change a repository or its remote.
    pub fn mutating_calls(&self) -> Vec<VcsCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_mutating())
            .cloned()
            .collect()
    }

    /// Whether `op` was called with `detail`.
    pub fn called_with(&self, op: &str, detail: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.op == op && c.detail == detail)
    }

    /// Forget recorded calls (injected failures are kept).
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Record `op` and return the injected failure, if any.
    fn enter(&self, op: &'static str, detail: impl Into<String>) -> Result<()> {
        self.calls.lock().unwrap().push(VcsCall {
            op,
            detail: detail.into(),
        });

        let mut failures = self.failures.lock().unwrap();
        match failures.get(op).copied() {
            None => Ok(()),
            Some(injection) => {
                if let Injection::Once = injection {
                    failures.remove(op);
                }
                Err(Error::CommandFailed {
                    command: format!("git {op}"),
                    code: Some(128),
                    stderr: "fatal: unable to access 'https://git.invalid/deps.git/': \
                             Could not resolve host: git.invalid"
                        .to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl<V: Vcs> Vcs for RecordingVcs<V> {
    fn is_repository(&self, dir: &Path) -> bool {
        self.calls.lock().unwrap().push(VcsCall {
            op: "is_repository",
            detail: String::new(),
        });
        self.inner.is_repository(dir)
    }

    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        self.enter("clone", url)?;
        self.inner.clone_repo(url, dest).await
    }

    async fn remotes(&self, dir: &Path) -> Result<Vec<Remote>> {
        self.enter("remotes", "")?;
        self.inner.remotes(dir).await
    }

    async fn tags_at_head(&self, dir: &Path) -> Result<Vec<String>> {
        self.enter("tags_at_head", "")?;
        self.inner.tags_at_head(dir).await
    }

    async fn fetch_tags(&self, dir: &Path, url: &str) -> Result<()> {
        self.enter("fetch_tags", url)?;
        self.inner.fetch_tags(dir, url).await
    }

    async fn rev_exists(&self, dir: &Path, rev: &str) -> Result<bool> {
        self.enter("rev_exists", rev)?;
        self.inner.rev_exists(dir, rev).await
    }

    async fn checkout(&self, dir: &Path, reference: &str) -> Result<()> {
        self.enter("checkout", reference)?;
        self.inner.checkout(dir, reference).await
    }

    async fn create_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        self.enter("create_branch", branch)?;
        self.inner.create_branch(dir, branch).await
    }

    async fn clean(&self, dir: &Path) -> Result<()> {
        self.enter("clean", "")?;
        self.inner.clean(dir).await
    }

    async fn stash(&self, dir: &Path) -> Result<()> {
        self.enter("stash", "")?;
        self.inner.stash(dir).await
    }

    async fn pull(&self, dir: &Path, url: &str, branch: &str) -> Result<()> {
        self.enter("pull", branch)?;
        self.inner.pull(dir, url, branch).await
    }

    async fn status(&self, dir: &Path) -> Result<StatusSummary> {
        self.enter("status", "")?;
        self.inner.status(dir).await
    }

    async fn add_all(&self, dir: &Path) -> Result<()> {
        self.enter("add_all", "")?;
        self.inner.add_all(dir).await
    }

    async fn add(&self, dir: &Path, path: &str) -> Result<()> {
        self.enter("add", path)?;
        self.inner.add(dir, path).await
    }

    async fn commit_all(&self, dir: &Path, message: &str) -> Result<()> {
        self.enter("commit_all", message)?;
        self.inner.commit_all(dir, message).await
    }

    async fn tag(&self, dir: &Path, name: &str) -> Result<TagOutcome> {
        self.enter("tag", name)?;
        self.inner.tag(dir, name).await
    }

    async fn push(&self, dir: &Path, url: &str, branch: &str) -> Result<()> {
        self.enter("push", branch)?;
        self.inner.push(dir, url, branch).await
    }
}
