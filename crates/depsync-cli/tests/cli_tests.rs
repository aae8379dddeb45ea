//! Binary tests for the `depsync` executable.

use assert_cmd::Command;
use depsync_test_utils::git::remote_tags;
use depsync_test_utils::project::{BASIC_MANIFEST, TestProject};
use predicates::prelude::*;
use tempfile::TempDir;

fn depsync() -> Command {
    let mut cmd = Command::cargo_bin("depsync").unwrap();
    for var in ["DEPSYNC_REPO", "DEPSYNC_BRANCH", "DEPSYNC_NPM", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

fn fingerprint_of(dir: &std::path::Path) -> String {
    let output = depsync()
        .args(["fingerprint", "-C"])
        .arg(dir)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn test_help_lists_commands() {
    depsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("fingerprint"))
        .stdout(predicate::str::contains("--cross-platform"));
}

#[test]
fn test_fingerprint_prints_tag_name_only() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("package.json"), BASIC_MANIFEST).unwrap();

    let fingerprint = fingerprint_of(temp.path());

    assert_eq!(fingerprint.len(), 44);
    assert!(!fingerprint.contains('/'));
}

#[test]
fn test_fingerprint_ignores_key_order_and_version() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    std::fs::write(
        a.path().join("package.json"),
        r#"{"version": "1.0.0", "dependencies": {"a": "1", "b": "2"}}"#,
    )
    .unwrap();
    std::fs::write(
        b.path().join("package.json"),
        r#"{"dependencies": {"b": "2", "a": "1"}, "version": "9.9.9"}"#,
    )
    .unwrap();

    assert_eq!(fingerprint_of(a.path()), fingerprint_of(b.path()));
}

#[test]
fn test_fingerprint_without_manifest_fails() {
    let temp = TempDir::new().unwrap();

    depsync()
        .args(["fingerprint", "-C"])
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn test_sync_without_repository_is_user_error() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("package.json"), BASIC_MANIFEST).unwrap();

    depsync()
        .arg("-C")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_directory_is_user_error() {
    let temp = TempDir::new().unwrap();

    depsync()
        .args(["fingerprint", "-C"])
        .arg(temp.path().join("nope"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot use directory"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("package.json"), BASIC_MANIFEST).unwrap();
    std::fs::write(temp.path().join(".depsync.toml"), "not_a_key = 1\n").unwrap();

    depsync()
        .arg("-C")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".depsync.toml"));
}

#[test]
fn test_skip_install_against_empty_remote_clones_and_publishes_nothing() {
    let project = TestProject::new(BASIC_MANIFEST);

    depsync()
        .args(["sync", "--skip-install", "--repo", project.remote_url(), "-C"])
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Syncing dependencies"))
        .stdout(predicate::str::contains("Nothing to publish"));

    project.assert_file_exists("node_modules/.git");
    assert!(remote_tags(&project.remote_path()).is_empty());
}

#[test]
fn test_repository_from_config_file() {
    let project = TestProject::new(BASIC_MANIFEST);
    std::fs::write(
        project.root().join(".depsync.toml"),
        format!("repo = {:?}\nskip_install = true\n", project.remote_url()),
    )
    .unwrap();

    depsync()
        .arg("-C")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to publish"));
}
