//! Daemon lifecycle specs
//!
//! Verify startup, the single-instance lock, heartbeats, and graceful
//! shutdown of a real wardend process.

use crate::prelude::*;
use fs2::FileExt;
use std::time::{Duration, Instant};

#[test]
fn startup_writes_pid_state_and_marker() {
    let workspace = Workspace::empty();
    let daemon = workspace.start();

    let state = workspace.state().unwrap();
    assert_eq!(state["running"], true);
    assert_eq!(state["pid"], daemon.pid());
    assert!(state["started_at"].is_string());
    assert!(workspace
        .log()
        .contains(&format!("--- wardend: starting (pid: {}) ---", daemon.pid())));
}

#[test]
fn heartbeats_tick_with_external_tools_missing() {
    let workspace = Workspace::empty();
    let mut daemon = workspace.start();

    let ticked = wait_for(SPEC_WAIT_MAX_MS, || {
        workspace
            .state()
            .and_then(|s| s["heartbeat_count"].as_u64())
            .is_some_and(|n| n >= 2)
    });
    assert!(ticked, "no heartbeats recorded\nlog:\n{}", workspace.log());
    assert!(daemon.is_running());
    assert!(workspace.state().unwrap()["last_heartbeat"].is_string());
}

#[test]
fn sigterm_shuts_down_gracefully() {
    let workspace = Workspace::empty();
    let mut daemon = workspace.start();

    daemon.signal("TERM");

    assert_eq!(daemon.wait_exit(SPEC_WAIT_MAX_MS), Some(0));
    assert_eq!(workspace.state().unwrap()["running"], false);
    assert!(!workspace.daemon_path("daemon.pid").exists());
    assert!(!workspace.daemon_path("daemon.lock").exists());
    assert!(workspace.log().contains("Daemon shutdown complete"));
}

#[test]
fn sigint_shuts_down_gracefully() {
    let workspace = Workspace::empty();
    let mut daemon = workspace.start();

    daemon.signal("INT");

    assert_eq!(daemon.wait_exit(SPEC_WAIT_MAX_MS), Some(0));
    assert_eq!(workspace.state().unwrap()["running"], false);
}

#[test]
fn lifecycle_kick_does_not_stop_the_daemon() {
    let workspace = Workspace::empty();
    let mut daemon = workspace.start();

    daemon.signal("USR1");
    let logged = wait_for(SPEC_WAIT_MAX_MS, || workspace.log().contains("Received SIGUSR1"));

    assert!(logged, "kick not logged\nlog:\n{}", workspace.log());
    assert!(daemon.is_running());
}

#[test]
fn duplicate_daemon_exits_with_conflict() {
    let workspace = Workspace::empty();
    let mut first = workspace.start();
    let state_before = workspace.state().unwrap();

    let started = Instant::now();
    let output = workspace.wardend().output().unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(&format!("wardend is already running (pid: {})", first.pid())),
        "got {stderr}"
    );
    assert!(workspace.log().contains("wardend is already running"));

    // The first daemon is untouched
    assert!(first.is_running());
    assert_eq!(workspace.pid_file(), Some(first.pid()));
    let state_after = workspace.state().unwrap();
    assert_eq!(state_after["pid"], state_before["pid"]);
    assert_eq!(state_after["started_at"], state_before["started_at"]);
    assert_eq!(state_after["running"], true);
}

#[test]
fn lock_held_by_another_process_blocks_startup() {
    let workspace = Workspace::empty();
    std::fs::create_dir_all(workspace.path().join("daemon")).unwrap();
    let lock = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(workspace.daemon_path("daemon.lock"))
        .unwrap();
    lock.try_lock_exclusive().unwrap();

    let output = workspace.wardend().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already running"));
    assert!(!workspace.daemon_path("daemon.pid").exists());
    assert!(workspace.state().is_none());
}

#[test]
fn restart_after_shutdown_succeeds() {
    let workspace = Workspace::empty();
    let mut first = workspace.start();
    first.signal("TERM");
    assert_eq!(first.wait_exit(SPEC_WAIT_MAX_MS), Some(0));

    let second = workspace.start();

    assert_eq!(workspace.state().unwrap()["pid"], second.pid());
    assert_eq!(workspace.state().unwrap()["running"], true);
}
