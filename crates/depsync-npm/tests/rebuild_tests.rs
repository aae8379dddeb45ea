//! Rebuild planning against the real command-length ceiling

use depsync_npm::rebuild::{MAX_COMMAND_LENGTH, group_packages};
use depsync_npm::{Platform, plan_rebuild};
use pretty_assertions::assert_eq;

fn long_names(count: usize) -> Vec<String> {
    // 40-character names: well over the ceiling in total
    (0..count)
        .map(|i| format!("@scope/native-module-with-long-name-{i:04}"))
        .collect()
}

#[test]
fn test_list_longer_than_ceiling_splits_into_groups_under_ceiling() {
    let names = long_names(500);
    let total: usize = names.iter().map(|n| n.len() + 1).sum();
    assert!(total > MAX_COMMAND_LENGTH);

    let overhead = "npm rebuild ".len();
    let groups = group_packages(&names, overhead, MAX_COMMAND_LENGTH);

    assert!(groups.len() >= 2, "expected a split, got {} group(s)", groups.len());
    for group in &groups {
        assert!(group.command_length(overhead) < MAX_COMMAND_LENGTH);
        assert!(!group.packages.is_empty());
    }
}

#[test]
fn test_grouping_preserves_every_name_once_in_sorted_order() {
    let mut names = long_names(300);
    names.reverse();

    let groups = group_packages(&names, 12, MAX_COMMAND_LENGTH);
    let flattened: Vec<String> = groups.into_iter().flat_map(|g| g.packages).collect();

    let mut expected = names.clone();
    expected.sort();
    assert_eq!(flattened, expected);
}

#[test]
fn test_grouping_is_deterministic_regardless_of_input_order() {
    let names = long_names(250);
    let mut shuffled = names.clone();
    shuffled.rotate_left(97);

    assert_eq!(
        group_packages(&names, 12, MAX_COMMAND_LENGTH),
        group_packages(&shuffled, 12, MAX_COMMAND_LENGTH)
    );
}

#[test]
fn test_plan_on_simulated_non_darwin_host_never_rebuilds_fsevents() {
    let mut installed = long_names(400);
    installed.push("fsevents".to_string());

    let plan = plan_rebuild(&installed, &Platform::new("linux"), "npm");

    assert!(plan.groups.len() >= 2);
    assert!(
        plan.groups
            .iter()
            .all(|g| !g.packages.iter().any(|p| p == "fsevents"))
    );
    assert_eq!(plan.skipped.len(), 1);
}
