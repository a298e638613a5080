// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use tempfile::tempdir;

fn saved_state(config: &Config) -> HeartbeatState {
    HeartbeatState::load(&config.state_path).unwrap().unwrap()
}

#[test]
fn paths_live_under_the_daemon_dir() {
    let config = Config::for_root("/srv/town");
    assert_eq!(config.daemon_dir(), PathBuf::from("/srv/town/daemon"));
    assert_eq!(config.lock_path, PathBuf::from("/srv/town/daemon/daemon.lock"));
    assert_eq!(config.pid_path, PathBuf::from("/srv/town/daemon/daemon.pid"));
    assert_eq!(config.log_path, PathBuf::from("/srv/town/daemon/daemon.log"));
    assert_eq!(config.state_path, PathBuf::from("/srv/town/daemon/state.json"));
    assert_eq!(config.heartbeat, HEARTBEAT_INTERVAL);
}

#[test]
#[serial(env)]
fn explicit_root_beats_environment() {
    std::env::set_var("WARDEN_ROOT", "/from/env");
    std::env::remove_var("WARDEN_HEARTBEAT_MS");
    let config = Config::load(Some(PathBuf::from("/from/flag"))).unwrap();
    assert_eq!(config.root, PathBuf::from("/from/flag"));

    let config = Config::load(None).unwrap();
    assert_eq!(config.root, PathBuf::from("/from/env"));
    std::env::remove_var("WARDEN_ROOT");
}

#[test]
#[serial(env)]
fn heartbeat_override() {
    let cases = [
        ("250", Duration::from_millis(250)),
        ("0", HEARTBEAT_INTERVAL),
        ("soon", HEARTBEAT_INTERVAL),
    ];
    for (value, expected) in cases {
        std::env::set_var("WARDEN_HEARTBEAT_MS", value);
        let config = Config::load(Some(PathBuf::from("/w"))).unwrap();
        assert_eq!(config.heartbeat, expected, "WARDEN_HEARTBEAT_MS={value}");
    }
    std::env::remove_var("WARDEN_HEARTBEAT_MS");
}

#[test]
fn startup_writes_pid_and_running_state() {
    let dir = tempdir().unwrap();
    let config = Config::for_root(dir.path());

    let daemon = startup(&config).unwrap();

    assert_eq!(read_pid(&config.pid_path), Some(std::process::id()));
    let state = saved_state(&config);
    assert!(state.running);
    assert_eq!(state.pid, std::process::id());
    assert_eq!(state.heartbeat_count, 0);
    assert!(state.last_heartbeat.is_none());
    assert_eq!(daemon.heartbeat(), &state);
}

#[test]
fn second_startup_is_refused_and_leaves_files_alone() {
    let dir = tempdir().unwrap();
    let config = Config::for_root(dir.path());
    let _running = startup(&config).unwrap();
    std::fs::write(&config.pid_path, "12345\n").unwrap();

    let err = startup(&config).err().unwrap();

    assert!(matches!(err, LifecycleError::AlreadyRunning(_)));
    assert_eq!(read_pid(&config.pid_path), Some(12345));
    assert!(saved_state(&config).running);
}

#[test]
fn externally_held_lock_is_respected() {
    let dir = tempdir().unwrap();
    let config = Config::for_root(dir.path());
    std::fs::create_dir_all(config.daemon_dir()).unwrap();
    let holder = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)
        .unwrap();
    holder.lock_exclusive().unwrap();

    assert!(matches!(
        startup(&config),
        Err(LifecycleError::AlreadyRunning(_))
    ));
    assert!(!config.pid_path.exists());
}

#[test]
fn shutdown_marks_stopped_and_releases_everything() {
    let dir = tempdir().unwrap();
    let config = Config::for_root(dir.path());
    let daemon = startup(&config).unwrap();

    daemon.shutdown();

    assert!(!config.pid_path.exists());
    assert!(!config.lock_path.exists());
    assert!(!saved_state(&config).running);
    // Lock is free again
    let again = startup(&config).unwrap();
    assert!(saved_state(&config).running);
    again.shutdown();
}

#[test]
fn shutdown_completes_without_pid_file() {
    let dir = tempdir().unwrap();
    let config = Config::for_root(dir.path());
    let daemon = startup(&config).unwrap();
    std::fs::remove_file(&config.pid_path).unwrap();

    daemon.shutdown();

    assert!(!saved_state(&config).running);
}

#[test]
fn heartbeats_are_counted_and_persisted() {
    let dir = tempdir().unwrap();
    let config = Config::for_root(dir.path());
    let mut daemon = startup(&config).unwrap();
    let now = Utc::now();

    daemon.record_heartbeat(now);
    daemon.record_heartbeat(now);

    let state = saved_state(&config);
    assert_eq!(state.heartbeat_count, 2);
    assert_eq!(state.last_heartbeat, Some(now));
}

#[test]
fn unwritable_pid_file_fails_startup_and_frees_the_lock() {
    let dir = tempdir().unwrap();
    let config = Config::for_root(dir.path());
    std::fs::create_dir_all(&config.pid_path).unwrap();

    let err = startup(&config).err().unwrap();
    assert!(matches!(err, LifecycleError::PidFile(..)));

    std::fs::remove_dir(&config.pid_path).unwrap();
    startup(&config).unwrap().shutdown();
}

#[yare::parameterized(
    plain    = { "4242", Some(4242) },
    newline  = { "4242\n", Some(4242) },
    empty    = { "", None },
    garbage  = { "pid", None },
)]
fn pid_file_contents(content: &str, expected: Option<u32>) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon.pid");
    std::fs::write(&path, content).unwrap();
    assert_eq!(read_pid(&path), expected);
}

#[test]
fn missing_pid_file_reads_as_none() {
    let dir = tempdir().unwrap();
    assert_eq!(read_pid(&dir.path().join("daemon.pid")), None);
}
