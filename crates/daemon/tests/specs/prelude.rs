//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running wardend against a temporary workspace.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 5000;

/// Heartbeat interval used by specs so several ticks fit in one test
const SPEC_HEARTBEAT_MS: &str = "100";

/// Returns the path to the wardend daemon binary built for this test run.
pub fn wardend_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_wardend"))
}

/// Poll `condition` until it holds or `timeout_ms` elapses
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    let poll_interval = Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// Temporary workspace root with helper methods.
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    /// Workspace with default config and no groups
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the workspace root
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub fn daemon_path(&self, name: &str) -> PathBuf {
        self.path().join("daemon").join(name)
    }

    pub fn pid_file(&self) -> Option<u32> {
        std::fs::read_to_string(self.daemon_path("daemon.pid"))
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    /// Parsed `daemon/state.json`, if present and complete
    pub fn state(&self) -> Option<serde_json::Value> {
        let content = std::fs::read_to_string(self.daemon_path("state.json")).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn log(&self) -> String {
        std::fs::read_to_string(self.daemon_path("daemon.log")).unwrap_or_default()
    }

    /// wardend command rooted here, with every external CLI unreachable
    pub fn wardend(&self) -> Command {
        let missing = self.path().join("missing-bin");
        let mut cmd = Command::new(wardend_binary());
        cmd.arg("--root")
            .arg(self.path())
            .current_dir(self.path())
            .env_remove("WARDEN_ROOT")
            .env("WARDEN_HEARTBEAT_MS", SPEC_HEARTBEAT_MS)
            .env("WARDEN_TMUX_BIN", missing.join("tmux"))
            .env("WARDEN_ISSUES_BIN", missing.join("bd"))
            .env("WARDEN_MAIL_BIN", missing.join("warden"))
            .env("WARDEN_GIT_BIN", missing.join("git"))
            .env("RUST_LOG", "info");
        cmd
    }

    /// Start a daemon in the background and wait until it holds the lock
    pub fn start(&self) -> Daemon {
        let child = self
            .wardend()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let pid = child.id();
        let ready = wait_for(SPEC_WAIT_MAX_MS, || {
            self.pid_file() == Some(pid) && self.state().is_some()
        });
        assert!(ready, "wardend did not start\nlog:\n{}", self.log());
        Daemon { child }
    }
}

/// A running wardend process; killed on drop if still alive.
pub struct Daemon {
    child: Child,
}

impl Daemon {
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Send a signal by name (e.g. "TERM", "USR1")
    pub fn signal(&self, name: &str) {
        let status = Command::new("kill")
            .arg(format!("-{name}"))
            .arg(self.pid().to_string())
            .status()
            .unwrap();
        assert!(status.success(), "kill -{name} failed");
    }

    /// Wait for exit, returning the exit code
    pub fn wait_exit(&mut self, timeout_ms: u64) -> Option<i32> {
        let mut code = None;
        let exited = wait_for(timeout_ms, || match self.child.try_wait() {
            Ok(Some(status)) => {
                code = status.code();
                true
            }
            _ => false,
        });
        assert!(exited, "wardend did not exit within {timeout_ms}ms");
        code
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
