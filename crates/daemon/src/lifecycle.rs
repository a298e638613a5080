// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: lock, PID file, heartbeat state.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use thiserror::Error;
use tracing::{info, warn};
use warden_storage::HeartbeatState;

use crate::env;

/// Directory under the workspace root owned by the running daemon
pub const DAEMON_DIR: &str = "daemon";

/// Fixed heartbeat interval; there is no activity-based backoff
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(3 * 60);

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root containing the groups and the daemon directory
    pub root: PathBuf,
    /// Path to the exclusive lock file
    pub lock_path: PathBuf,
    /// Path to the informational PID file
    pub pid_path: PathBuf,
    /// Path to the append-only daemon log
    pub log_path: PathBuf,
    /// Path to the heartbeat state record
    pub state_path: PathBuf,
    pub heartbeat: Duration,
}

impl Config {
    /// Resolve the root (`--root` > `WARDEN_ROOT` > cwd) and apply env overrides
    pub fn load(root: Option<PathBuf>) -> Result<Self, LifecycleError> {
        let root = match root.or_else(env::workspace_root) {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        let mut config = Self::for_root(root);
        if let Some(interval) = env::heartbeat_ms() {
            config.heartbeat = interval;
        }
        Ok(config)
    }

    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let dir = root.join(DAEMON_DIR);
        Self {
            lock_path: dir.join("daemon.lock"),
            pid_path: dir.join("daemon.pid"),
            log_path: dir.join("daemon.log"),
            state_path: dir.join("state.json"),
            heartbeat: HEARTBEAT_INTERVAL,
            root,
        }
    }

    pub fn daemon_dir(&self) -> PathBuf {
        self.root.join(DAEMON_DIR)
    }
}

/// Resources owned by the running daemon
pub struct DaemonState {
    pub config: Config,
    /// Holds the exclusive lock for as long as the daemon runs
    lock_file: File,
    heartbeat: HeartbeatState,
}

impl DaemonState {
    pub fn heartbeat(&self) -> &HeartbeatState {
        &self.heartbeat
    }

    /// Count a completed heartbeat and persist the record best-effort
    pub fn record_heartbeat(&mut self, now: DateTime<Utc>) {
        self.heartbeat.record_heartbeat(now);
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.heartbeat.save(&self.config.state_path) {
            warn!(
                path = %self.config.state_path.display(),
                error = %e,
                "failed to write heartbeat state",
            );
        }
    }

    /// Release everything the daemon owns. Every step runs even if an
    /// earlier one fails.
    pub fn shutdown(mut self) {
        info!("Shutting down daemon...");

        // 1. Mark the record stopped
        self.heartbeat.stopped();
        self.persist();

        // 2. Release the lock
        if let Err(e) = FileExt::unlock(&self.lock_file) {
            warn!("Failed to release daemon lock: {}", e);
        }

        // 3. Remove PID file
        if self.config.pid_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.pid_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 4. Remove lock file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove lock file: {}", e);
            }
        }

        info!("Daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to acquire lock: daemon already running?")]
    AlreadyRunning(#[source] std::io::Error),

    #[error("Failed to write PID file {0}: {1}")]
    PidFile(PathBuf, std::io::Error),

    #[error("Invalid log path: {0}")]
    LogPath(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Acquire the lock, write the PID file and the initial heartbeat record
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config) {
        Ok(state) => Ok(state),
        Err(e) => {
            // The PID file belongs to the running daemon when the lock is taken
            if !matches!(e, LifecycleError::AlreadyRunning(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create daemon directory
    std::fs::create_dir_all(config.daemon_dir())?;

    // 2. Acquire lock FIRST - prevents races
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::AlreadyRunning)?;

    // 3. Write PID file
    let pid = std::process::id();
    std::fs::write(&config.pid_path, format!("{pid}\n"))
        .map_err(|e| LifecycleError::PidFile(config.pid_path.clone(), e))?;

    // 4. Initial heartbeat record
    let state = DaemonState {
        config: config.clone(),
        lock_file,
        heartbeat: HeartbeatState::starting(pid, Utc::now()),
    };
    state.persist();

    info!(
        pid,
        root = %config.root.display(),
        heartbeat_secs = config.heartbeat.as_secs_f64(),
        "daemon lock acquired",
    );
    Ok(state)
}

/// Remove files written by a startup attempt that did not complete
fn cleanup_on_failure(config: &Config) {
    if config.pid_path.exists() {
        if let Err(e) = std::fs::remove_file(&config.pid_path) {
            warn!("Failed to remove PID file: {}", e);
        }
    }
}

/// PID recorded by the running daemon, if readable
pub fn read_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
