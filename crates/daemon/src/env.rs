// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// Workspace root override (`WARDEN_ROOT`)
pub fn workspace_root() -> Option<PathBuf> {
    std::env::var("WARDEN_ROOT")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Heartbeat interval override
pub fn heartbeat_ms() -> Option<Duration> {
    std::env::var("WARDEN_HEARTBEAT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}
