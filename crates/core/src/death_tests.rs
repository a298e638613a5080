// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn three_deaths_in_window_fire_once_then_clear() {
    let mut window = DeathWindow::default();
    assert_eq!(window.record("grp-a", 0), None);
    assert_eq!(window.record("grp-b", 4_000), None);

    let alarm = window.record("grp-c", 10_000).unwrap();
    assert_eq!(alarm.sessions, vec!["grp-a", "grp-b", "grp-c"]);
    assert_eq!(alarm.window, MASS_DEATH_WINDOW);
    assert!(window.is_empty());

    // Same burst continues: starts a new count
    assert_eq!(window.record("grp-d", 11_000), None);
    assert_eq!(window.record("grp-e", 46_000), None);
    assert_eq!(window.len(), 1);
}

#[test]
fn deaths_outside_window_are_trimmed() {
    let mut window = DeathWindow::default();
    window.record("grp-a", 0);
    window.record("grp-b", 20_000);
    assert_eq!(window.record("grp-c", 31_000), None);
    assert_eq!(
        window
            .records()
            .iter()
            .map(|r| r.session.as_str())
            .collect::<Vec<_>>(),
        vec!["grp-b", "grp-c"]
    );
}

#[test]
fn boundary_is_inclusive() {
    let mut window = DeathWindow::default();
    window.record("grp-a", 0);
    window.record("grp-b", 15_000);
    assert!(window.record("grp-c", 30_000).is_some());
}

#[test]
fn repeat_deaths_of_one_session_count_once() {
    let mut window = DeathWindow::default();
    assert_eq!(window.record("grp-a", 0), None);
    assert_eq!(window.record("grp-a", 5_000), None);
    assert_eq!(window.record("grp-a", 10_000), None);
    assert_eq!(window.len(), 1);
    assert_eq!(window.records()[0].at_ms, 10_000);

    assert_eq!(window.record("grp-b", 12_000), None);
    let alarm = window.record("grp-c", 14_000).unwrap();
    assert_eq!(alarm.sessions, vec!["grp-a", "grp-b", "grp-c"]);
}

#[test]
fn custom_threshold() {
    let mut window = DeathWindow::new(Duration::from_secs(5), 2);
    assert!(window.record("x", 0).is_none());
    assert!(window.record("y", 5_000).is_some());
}
