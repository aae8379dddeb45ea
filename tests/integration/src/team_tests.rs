//! Several machines sharing one dependency repository.
//!
//! Each "machine" is a separate working directory with its own synchronizer;
//! they only meet through the bare remote.

use std::path::Path;

use depsync_core::{Error, RepositoryState, SyncAction, SyncConfig, Synchronizer};
use depsync_git::GitCli;
use depsync_npm::Platform;
use depsync_test_utils::git::{DEFAULT_BRANCH, identity_git, remote_branch_has_path, remote_tags};
use depsync_test_utils::npm::NATIVE_OUTPUT;
use depsync_test_utils::project::{BASIC_MANIFEST, TestProject};
use depsync_test_utils::{FakeNpm, RecordingVcs};
use pretty_assertions::assert_eq;

type Machine = Synchronizer<RecordingVcs<GitCli>, FakeNpm>;

const UPGRADED: &str = r#"{
  "name": "app",
  "version": "1.1.0",
  "dependencies": { "left-pad": "^1.3.0", "lodash": "^4.17.21" },
  "devDependencies": { "mocha": "^10.0.0" }
}
"#;

const NATIVE: &str = r#"{
  "name": "native-app",
  "version": "2.0.0",
  "dependencies": { "bcrypt": "^5.1.0", "fsevents": "^2.3.3" },
  "scripts": { "preinstall": "node check.js", "postinstall": "node setup.js" }
}
"#;

fn machine(dir: &Path, config: SyncConfig, npm: FakeNpm, platform: &str) -> Machine {
    Synchronizer::new(RecordingVcs::new(identity_git()), npm, config, dir)
        .with_platform(Platform::new(platform))
}

fn shared_config(project: &TestProject) -> SyncConfig {
    SyncConfig {
        repo: Some(project.remote_url().to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_second_machine_never_installs() {
    let project = TestProject::new(BASIC_MANIFEST);
    let laptop = machine(&project.root(), shared_config(&project), FakeNpm::new(), "linux");
    let ci_dir = project.sibling("ci", BASIC_MANIFEST);
    let ci = machine(&ci_dir, shared_config(&project), FakeNpm::new(), "linux");

    let published = laptop.run().await.unwrap();
    assert_eq!(published.action, SyncAction::Published);

    let reused = ci.run().await.unwrap();
    assert_eq!(reused.action, SyncAction::Reused);
    assert_eq!(reused.fingerprint, published.fingerprint);

    // the laptop upgrades, then CI picks up the same manifest
    project.write_manifest(UPGRADED);
    let upgraded = laptop.run().await.unwrap();
    assert_eq!(upgraded.action, SyncAction::Published);

    std::fs::write(ci_dir.join("package.json"), UPGRADED).unwrap();
    let followed = ci.run().await.unwrap();
    assert_eq!(followed.state, RepositoryState::PresentDivergent);
    assert_eq!(followed.action, SyncAction::Reused);
    assert_eq!(followed.fingerprint, upgraded.fingerprint);

    assert_eq!(ci.package_manager().install_count(), 0);
    assert!(ci_dir.join("node_modules/lodash/index.js").is_file());
    assert_eq!(
        remote_tags(&project.remote_path()),
        {
            let mut tags = vec![
                published.fingerprint.to_string(),
                upgraded.fingerprint.to_string(),
            ];
            tags.sort();
            tags
        }
    );
}

#[tokio::test]
async fn test_each_host_rebuilds_only_its_own_native_modules() {
    let project = TestProject::new(NATIVE);
    let cross = SyncConfig {
        cross_platform: true,
        ..shared_config(&project)
    };
    let native_npm = || FakeNpm::new().with_native("bcrypt").with_native("fsevents");

    let mac = machine(&project.root(), cross.clone(), native_npm(), "darwin");
    let published = mac.run().await.unwrap();
    assert_eq!(published.action, SyncAction::Published);
    assert_eq!(mac.package_manager().rebuilt(), vec!["bcrypt", "fsevents"]);

    let remote = project.remote_path();
    assert!(remote_branch_has_path(&remote, DEFAULT_BRANCH, ".gitignore"));
    for package in ["bcrypt", "fsevents"] {
        project.assert_file_contains(
            "node_modules/.gitignore",
            &format!("{package}/{NATIVE_OUTPUT}"),
        );
        assert!(!remote_branch_has_path(
            &remote,
            DEFAULT_BRANCH,
            &format!("{package}/{NATIVE_OUTPUT}")
        ));
    }

    let linux_dir = project.sibling("linux-box", NATIVE);
    let linux = machine(&linux_dir, cross, native_npm(), "linux");
    let reused = linux.run().await.unwrap();

    assert_eq!(reused.action, SyncAction::Reused);
    let npm = linux.package_manager();
    assert_eq!(npm.install_count(), 0);
    assert_eq!(npm.rebuilt(), vec!["bcrypt"]);
    assert_eq!(npm.scripts(), vec!["preinstall", "postinstall"]);
    assert!(
        linux_dir
            .join("node_modules/bcrypt")
            .join(NATIVE_OUTPUT)
            .is_file()
    );
    assert!(
        !linux_dir
            .join("node_modules/fsevents")
            .join(NATIVE_OUTPUT)
            .exists()
    );
}

#[tokio::test]
async fn test_unreachable_remote_fails_run_and_next_run_recovers() {
    let project = TestProject::new(BASIC_MANIFEST);
    let laptop = machine(&project.root(), shared_config(&project), FakeNpm::new(), "linux");
    laptop.run().await.unwrap();

    let ci_dir = project.sibling("ci", BASIC_MANIFEST);
    machine(&ci_dir, shared_config(&project), FakeNpm::new(), "linux")
        .run()
        .await
        .unwrap();

    project.write_manifest(UPGRADED);
    let upgraded = laptop.run().await.unwrap();
    std::fs::write(ci_dir.join("package.json"), UPGRADED).unwrap();

    let offline = machine(&ci_dir, shared_config(&project), FakeNpm::new(), "linux");
    offline.vcs().fail_always("fetch_tags");
    let err = offline.run().await.unwrap_err();
    assert!(matches!(err, Error::Git(_)), "got: {err:?}");

    let online = machine(&ci_dir, shared_config(&project), FakeNpm::new(), "linux");
    let report = online.run().await.unwrap();
    assert_eq!(report.action, SyncAction::Reused);
    assert_eq!(report.fingerprint, upgraded.fingerprint);
    assert_eq!(online.package_manager().install_count(), 0);
}
