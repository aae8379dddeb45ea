//! The VCS command interface consumed by the synchronizer

use std::path::Path;

use async_trait::async_trait;

use crate::command::GitCli;
use crate::status::StatusSummary;
use crate::Result;

/// A configured remote as listed by `git remote -v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Outcome of creating a tag. An existing tag of the same name is expected
/// when re-publishing an unchanged dependency set, so it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Created,
    AlreadyExists,
}

/// Version-control operations, each against an explicit directory.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Whether `dir` is itself the root of a repository.
    fn is_repository(&self, dir: &Path) -> bool;

    /// Clone `url` into `dest`, which must not exist yet.
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// List configured remotes (`remote -v`).
    async fn remotes(&self, dir: &Path) -> Result<Vec<Remote>>;

    /// Tags pointing at the checked-out commit (`tag -l --points-at HEAD`).
    async fn tags_at_head(&self, dir: &Path) -> Result<Vec<String>>;

    /// Fetch all tags from `url` (`fetch -t`).
    async fn fetch_tags(&self, dir: &Path, url: &str) -> Result<()>;

    /// Whether `rev` resolves to a commit (`rev-parse --verify`).
    ///
    /// An unknown revision is `Ok(false)`; any other failure is an error.
    async fn rev_exists(&self, dir: &Path, rev: &str) -> Result<bool>;

    async fn checkout(&self, dir: &Path, reference: &str) -> Result<()>;

    /// Point HEAD at `branch`, creating or resetting it (`checkout -B`).
    ///
    /// Also works on an unborn HEAD, where plain `checkout` has nothing to
    /// switch from.
    async fn create_branch(&self, dir: &Path, branch: &str) -> Result<()>;

    /// Remove untracked files and directories (`clean -df`).
    async fn clean(&self, dir: &Path) -> Result<()>;

    /// Stash uncommitted and untracked changes.
    async fn stash(&self, dir: &Path) -> Result<()>;

    async fn pull(&self, dir: &Path, url: &str, branch: &str) -> Result<()>;

    /// `status --porcelain -z --untracked-files=all`, parsed.
    async fn status(&self, dir: &Path) -> Result<StatusSummary>;

    /// Stage every change in the working tree.
    async fn add_all(&self, dir: &Path) -> Result<()>;

    /// Stage a single path relative to `dir`.
    async fn add(&self, dir: &Path, path: &str) -> Result<()>;

    /// `commit -a -m <message>`
    async fn commit_all(&self, dir: &Path, message: &str) -> Result<()>;

    async fn tag(&self, dir: &Path, name: &str) -> Result<TagOutcome>;

    /// Push `branch` and all tags to `url`.
    async fn push(&self, dir: &Path, url: &str, branch: &str) -> Result<()>;
}

/// Parse `git remote -v` output into unique remotes.
pub fn parse_remotes(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url)) = (fields.next(), fields.next()) else {
            continue;
        };
        if !remotes.iter().any(|r| r.name == name && r.url == url) {
            remotes.push(Remote {
                name: name.to_string(),
                url: url.to_string(),
            });
        }
    }
    remotes
}

/// Exit code of `rev-parse --verify --quiet` for a name that does not resolve.
const REV_NOT_FOUND: Option<i32> = Some(1);

impl GitCli {
    /// Whether `name` resolves. Only the exit code is read; stderr is
    /// localized.
    async fn verify(&self, dir: &Path, name: &str) -> Result<bool> {
        let args = ["rev-parse", "--verify", "--quiet", name];
        let output = self.output(dir, &args).await?;
        if output.success() {
            return Ok(true);
        }
        if output.code == REV_NOT_FOUND {
            tracing::debug!(name, "Revision not found");
            return Ok(false);
        }
        Err(self.failure(&args, output))
    }
}

#[async_trait]
impl Vcs for GitCli {
    fn is_repository(&self, dir: &Path) -> bool {
        git2::Repository::open(dir).is_ok()
    }

    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let dest_arg = dest.to_string_lossy();
        self.run(parent, &["clone", url, dest_arg.as_ref()]).await?;
        Ok(())
    }

    async fn remotes(&self, dir: &Path) -> Result<Vec<Remote>> {
        let output = self.run(dir, &["remote", "-v"]).await?;
        Ok(parse_remotes(&output))
    }

    async fn tags_at_head(&self, dir: &Path) -> Result<Vec<String>> {
        let output = self.run(dir, &["tag", "-l", "--points-at", "HEAD"]).await?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect())
    }

    async fn fetch_tags(&self, dir: &Path, url: &str) -> Result<()> {
        self.run(dir, &["fetch", "-t", url]).await?;
        Ok(())
    }

    async fn rev_exists(&self, dir: &Path, rev: &str) -> Result<bool> {
        self.verify(dir, &format!("{rev}^{{commit}}")).await
    }

    async fn checkout(&self, dir: &Path, reference: &str) -> Result<()> {
        self.run(dir, &["checkout", reference]).await?;
        Ok(())
    }

    async fn create_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        self.run(dir, &["checkout", "-B", branch]).await?;
        Ok(())
    }

    async fn clean(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["clean", "-df"]).await?;
        Ok(())
    }

    async fn stash(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["stash", "--include-untracked"]).await?;
        Ok(())
    }

    async fn pull(&self, dir: &Path, url: &str, branch: &str) -> Result<()> {
        self.run(dir, &["pull", url, branch]).await?;
        Ok(())
    }

    async fn status(&self, dir: &Path) -> Result<StatusSummary> {
        let args = ["status", "--porcelain", "-z", "--untracked-files=all"];
        let output = self.run(dir, &args).await?;
        StatusSummary::parse(&output)
    }

    async fn add_all(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["add", "-A", "."]).await?;
        Ok(())
    }

    async fn add(&self, dir: &Path, path: &str) -> Result<()> {
        self.run(dir, &["add", "--", path]).await?;
        Ok(())
    }

    async fn commit_all(&self, dir: &Path, message: &str) -> Result<()> {
        self.run(dir, &["commit", "-a", "-m", message]).await?;
        Ok(())
    }

    async fn tag(&self, dir: &Path, name: &str) -> Result<TagOutcome> {
        if self.verify(dir, &format!("refs/tags/{name}")).await? {
            tracing::debug!(tag = name, "Tag already exists");
            return Ok(TagOutcome::AlreadyExists);
        }
        self.run(dir, &["tag", name]).await?;
        Ok(TagOutcome::Created)
    }

    async fn push(&self, dir: &Path, url: &str, branch: &str) -> Result<()> {
        self.run(dir, &["push", url, branch, "--tags"]).await?;
        Ok(())
    }
}
