// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn write_creates_parent_and_leaves_no_tmp() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon").join("state.json");

    write_json_atomic(&path, &serde_json::json!({"a": 1})).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["a"], 1);
}

#[test]
fn write_replaces_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    write_json_atomic(&path, &1).unwrap();
    write_json_atomic(&path, &2).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "2");
}

#[test]
fn bak_rotation_keeps_three() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    for generation in 1..=4 {
        let bak = rotate_bak_path(&path);
        fs::write(&bak, format!("{generation}")).unwrap();
    }

    assert_eq!(fs::read_to_string(path.with_extension("bak")).unwrap(), "4");
    assert_eq!(fs::read_to_string(path.with_extension("bak.2")).unwrap(), "3");
    assert_eq!(fs::read_to_string(path.with_extension("bak.3")).unwrap(), "2");
    assert!(!path.with_extension("bak.4").exists());
}
