// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::tempdir;

fn write_group(root: &Path, name: &str, toml: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(GROUP_CONFIG_FILE), toml).unwrap();
}

#[test]
fn missing_workspace_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = WorkspaceConfig::load(dir.path()).unwrap();
    assert_eq!(config, WorkspaceConfig::default());
    assert_eq!(config.lifecycle_inbox, "coordinator");
}

#[test]
fn workspace_config_partial_override() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(WORKSPACE_CONFIG_FILE),
        "session_prefix = \"town\"\nlifecycle_inbox = \"overseer\"\n",
    )
    .unwrap();

    let config = WorkspaceConfig::load(dir.path()).unwrap();
    assert_eq!(config.session_prefix, "town");
    assert_eq!(config.lifecycle_inbox, "overseer");
    assert_eq!(config.issue_prefix, "hq");
}

#[test]
fn malformed_workspace_config_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(WORKSPACE_CONFIG_FILE), "session_prefix = [").unwrap();
    assert!(matches!(
        WorkspaceConfig::load(dir.path()),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn load_discovers_groups_and_skips_invalid() {
    let dir = tempdir().unwrap();
    write_group(dir.path(), "alpha", "status = \"parked\"\n");
    write_group(dir.path(), "beta", "");
    write_group(dir.path(), "broken", "status = \"exploded\"\n");
    fs::create_dir_all(dir.path().join("daemon")).unwrap();

    let ws = Workspace::load(dir.path()).unwrap();
    let names: Vec<_> = ws.groups.keys().cloned().collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert_eq!(ws.group("alpha").unwrap().status, GroupStatus::Parked);
    assert_eq!(ws.invalid_groups.len(), 1);
    assert_eq!(ws.invalid_groups[0].0, "broken");
}

#[yare::parameterized(
    operational = { GroupStatus::Operational, true,  None },
    parked      = { GroupStatus::Parked,      true,  Some("group is parked") },
    docked      = { GroupStatus::Docked,      true,  Some("group is docked") },
    no_restart  = { GroupStatus::Operational, false, Some("auto_restart disabled") },
)]
fn non_operational_reason(status: GroupStatus, auto_restart: bool, expected: Option<&str>) {
    let group = GroupConfig {
        status,
        auto_restart,
        ..GroupConfig::default()
    };
    assert_eq!(group.non_operational_reason().as_deref(), expected);
}

#[test]
fn group_theme_explicit_and_default() {
    let group: GroupConfig = toml::from_str("[theme]\ncolor = \"colour1\"\n").unwrap();
    assert_eq!(group.theme_for("grp").color, "colour1");

    let plain = GroupConfig::default();
    let theme = plain.theme_for("grp");
    assert_eq!(theme, default_theme("grp"));
    assert_eq!(theme.title.as_deref(), Some("grp"));
    assert!(THEME_PALETTE.contains(&theme.color.as_str()));
}

#[test]
fn roster_lists_workers_then_crew() {
    let dir = tempdir().unwrap();
    write_group(dir.path(), "grp", "");
    for sub in ["raiders/n2", "raiders/n1", "raiders/.hidden", "crew/max"] {
        fs::create_dir_all(dir.path().join("grp").join(sub)).unwrap();
    }
    fs::write(dir.path().join("grp/raiders/notes.txt"), "").unwrap();

    let ws = Workspace::load(dir.path()).unwrap();
    let roster = ws.roster("grp").unwrap();
    assert_eq!(
        roster,
        vec![
            AgentIdentity::worker("grp", "n1"),
            AgentIdentity::worker("grp", "n2"),
            AgentIdentity::crew("grp", "max"),
        ]
    );
}

#[test]
fn roster_of_empty_group_is_empty() {
    let dir = tempdir().unwrap();
    write_group(dir.path(), "grp", "");
    let ws = Workspace::load(dir.path()).unwrap();
    assert!(ws.roster("grp").unwrap().is_empty());
}

#[test]
fn naming_uses_group_prefixes() {
    let ws = Workspace::new("/ws", WorkspaceConfig::default()).with_group(
        "grp",
        GroupConfig {
            session_prefix: Some("g".to_string()),
            ..GroupConfig::default()
        },
    );
    let naming = ws.naming();
    assert_eq!(naming.session_name(&AgentIdentity::observer("grp")), "g-observer");
    assert_eq!(naming.session_name(&AgentIdentity::Coordinator), "hq-coordinator");
}
