use std::fs;
use std::path::PathBuf;

use depsync_git::{Error, GitCli, TagOutcome, Vcs};
use depsync_test_utils::git::{identity_git, init_bare_remote, remote_commit_count, remote_tags};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// An empty bare remote and a fresh clone of it.
async fn setup_clone() -> (TempDir, GitCli, String, PathBuf) {
    let temp = TempDir::new().unwrap();
    let url = init_bare_remote(&temp.path().join("remote.git"));
    let work = temp.path().join("work");
    let git = identity_git();
    git.clone_repo(&url, &work).await.unwrap();
    (temp, git, url, work)
}

async fn commit_file(git: &GitCli, dir: &std::path::Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
    git.add_all(dir).await.unwrap();
    git.commit_all(dir, &format!("add {name}")).await.unwrap();
}

#[tokio::test]
async fn test_clone_records_remote_url() {
    let (_temp, git, url, work) = setup_clone().await;

    assert!(git.is_repository(&work));
    let remotes = git.remotes(&work).await.unwrap();
    assert_eq!(remotes.len(), 1);
    assert_eq!(remotes[0].name, "origin");
    assert_eq!(remotes[0].url, url);
}

#[tokio::test]
async fn test_plain_directory_is_not_a_repository() {
    let temp = TempDir::new().unwrap();
    assert!(!GitCli::new().is_repository(temp.path()));
}

#[tokio::test]
async fn test_unborn_head_has_no_revision() {
    let (_temp, git, _url, work) = setup_clone().await;

    assert!(!git.rev_exists(&work, "HEAD").await.unwrap());
    git.create_branch(&work, "master").await.unwrap();
    commit_file(&git, &work, "a.txt", "a").await;
    assert!(git.rev_exists(&work, "HEAD").await.unwrap());
    assert!(!git.rev_exists(&work, "no-such-tag").await.unwrap());
}

#[tokio::test]
async fn test_tag_twice_reports_existing_tag() {
    let (_temp, git, _url, work) = setup_clone().await;
    git.create_branch(&work, "master").await.unwrap();
    commit_file(&git, &work, "a.txt", "a").await;

    assert_eq!(git.tag(&work, "abc_123=").await.unwrap(), TagOutcome::Created);
    assert_eq!(
        git.tag(&work, "abc_123=").await.unwrap(),
        TagOutcome::AlreadyExists
    );
    assert_eq!(git.tags_at_head(&work).await.unwrap(), vec!["abc_123="]);
}

#[tokio::test]
async fn test_status_separates_staged_and_untracked() {
    let (_temp, git, _url, work) = setup_clone().await;
    git.create_branch(&work, "master").await.unwrap();
    fs::create_dir_all(work.join("pkg/build")).unwrap();
    fs::write(work.join("pkg/build/out.node"), "bin").unwrap();

    let status = git.status(&work).await.unwrap();
    assert_eq!(status.untracked, vec!["pkg/build/out.node"]);
    assert!(!status.has_changes());

    git.add(&work, "pkg/build/out.node").await.unwrap();
    let status = git.status(&work).await.unwrap();
    assert_eq!(status.index.added, vec!["pkg/build/out.node"]);
    assert!(status.has_changes());
}

#[tokio::test]
async fn test_status_keeps_non_ascii_paths_verbatim() {
    let (_temp, git, _url, work) = setup_clone().await;
    git.create_branch(&work, "master").await.unwrap();
    fs::create_dir_all(work.join("pkg/build")).unwrap();
    fs::write(work.join("pkg/build/café.node"), "bin").unwrap();
    fs::write(work.join("pkg/build/with space.node"), "bin").unwrap();

    let status = git.status(&work).await.unwrap();
    assert_eq!(
        status.untracked,
        vec!["pkg/build/café.node", "pkg/build/with space.node"]
    );
}

#[tokio::test]
async fn test_status_reports_rename_by_new_path() {
    let (_temp, git, _url, work) = setup_clone().await;
    git.create_branch(&work, "master").await.unwrap();
    commit_file(&git, &work, "old.js", "module.exports = 1;\n").await;

    fs::rename(work.join("old.js"), work.join("new.js")).unwrap();
    git.add_all(&work).await.unwrap();

    let status = git.status(&work).await.unwrap();
    assert_eq!(status.index.renamed, vec!["new.js"]);
    assert!(status.untracked.is_empty());
}

#[tokio::test]
async fn test_revision_and_tag_checks_ignore_locale() {
    let (_temp, _git, _url, work) = setup_clone().await;
    let git = identity_git()
        .with_env("LC_ALL", "de_DE.UTF-8")
        .with_env("LANG", "de_DE.UTF-8")
        .with_env("LANGUAGE", "de");

    assert!(!git.rev_exists(&work, "HEAD").await.unwrap());
    git.create_branch(&work, "master").await.unwrap();
    commit_file(&git, &work, "a.txt", "a").await;
    assert!(git.rev_exists(&work, "HEAD").await.unwrap());

    assert_eq!(git.tag(&work, "fp").await.unwrap(), TagOutcome::Created);
    assert_eq!(
        git.tag(&work, "fp").await.unwrap(),
        TagOutcome::AlreadyExists
    );
}

#[tokio::test]
async fn test_revision_check_outside_repository_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = identity_git()
        .rev_exists(temp.path(), "HEAD")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CommandFailed { .. }));
}

#[tokio::test]
async fn test_push_publishes_branch_and_tags() {
    let (temp, git, url, work) = setup_clone().await;
    git.create_branch(&work, "master").await.unwrap();
    commit_file(&git, &work, "a.txt", "a").await;
    git.tag(&work, "fp-one").await.unwrap();

    git.push(&work, &url, "master").await.unwrap();

    let remote = temp.path().join("remote.git");
    assert_eq!(remote_tags(&remote), vec!["fp-one"]);
    assert_eq!(remote_commit_count(&remote, "master"), 1);
}

#[tokio::test]
async fn test_fetch_tags_then_checkout_and_clean() {
    let (temp, git, url, work) = setup_clone().await;
    git.create_branch(&work, "master").await.unwrap();
    commit_file(&git, &work, "a.txt", "a").await;
    git.tag(&work, "first").await.unwrap();
    commit_file(&git, &work, "b.txt", "b").await;
    git.push(&work, &url, "master").await.unwrap();

    let other = temp.path().join("other");
    git.clone_repo(&url, &other).await.unwrap();
    git.fetch_tags(&other, &url).await.unwrap();
    fs::write(other.join("stray.txt"), "x").unwrap();

    git.checkout(&other, "first").await.unwrap();
    git.clean(&other).await.unwrap();

    assert!(other.join("a.txt").exists());
    assert!(!other.join("b.txt").exists());
    assert!(!other.join("stray.txt").exists());
}

#[tokio::test]
async fn test_stash_then_pull_updates_mainline() {
    let (temp, git, url, work) = setup_clone().await;
    git.create_branch(&work, "master").await.unwrap();
    commit_file(&git, &work, "a.txt", "a").await;
    git.push(&work, &url, "master").await.unwrap();

    let other = temp.path().join("other");
    git.clone_repo(&url, &other).await.unwrap();
    commit_file(&git, &work, "b.txt", "b").await;
    git.push(&work, &url, "master").await.unwrap();

    fs::write(other.join("scratch.txt"), "local").unwrap();
    git.stash(&other).await.unwrap();
    git.checkout(&other, "master").await.unwrap();
    git.pull(&other, &url, "master").await.unwrap();

    assert!(other.join("b.txt").exists());
    assert!(!other.join("scratch.txt").exists());
}

#[tokio::test]
async fn test_failed_command_carries_stderr() {
    let (_temp, git, _url, work) = setup_clone().await;
    git.create_branch(&work, "master").await.unwrap();
    commit_file(&git, &work, "a.txt", "a").await;

    let err = git.checkout(&work, "does-not-exist").await.unwrap_err();

    match err {
        Error::CommandFailed { command, stderr, .. } => {
            assert_eq!(command, "git checkout does-not-exist");
            assert!(!stderr.is_empty());
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}
