// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat state record (`daemon/state.json`).
//!
//! Written best-effort by the supervisor and read by operator tools. The
//! daemon never consults it for correctness; the file lock is authoritative.

use crate::atomic::{rotate_bak_path, write_json_atomic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatState {
    pub running: bool,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub last_heartbeat: Option<DateTime<Utc>>,
    #[serde(default)]
    pub heartbeat_count: u64,
}

impl HeartbeatState {
    /// State of a supervisor that just started
    pub fn starting(pid: u32, now: DateTime<Utc>) -> Self {
        Self {
            running: true,
            pid,
            started_at: now,
            last_heartbeat: None,
            heartbeat_count: 0,
        }
    }

    /// Count one completed heartbeat
    pub fn record_heartbeat(&mut self, now: DateTime<Utc>) {
        self.heartbeat_count += 1;
        self.last_heartbeat = Some(now);
    }

    pub fn stopped(&mut self) {
        self.running = false;
    }

    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        write_json_atomic(path, self)?;
        Ok(())
    }

    /// Load the record if it exists.
    ///
    /// A corrupt file is moved aside to `.bak` and treated as missing.
    pub fn load(path: &Path) -> Result<Option<Self>, StateError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                let bak_path = rotate_bak_path(path);
                warn!(
                    error = %e,
                    path = %path.display(),
                    bak = %bak_path.display(),
                    "corrupt state file, moving to .bak",
                );
                fs::rename(path, &bak_path)?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
