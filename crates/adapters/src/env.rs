// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn binary(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Multiplexer binary (default: `tmux`).
pub fn tmux_bin() -> String {
    binary("WARDEN_TMUX_BIN", "tmux")
}

/// Issue-store CLI (default: `bd`).
pub fn issues_bin() -> String {
    binary("WARDEN_ISSUES_BIN", "bd")
}

/// Mailbox CLI (default: `warden`).
pub fn mail_bin() -> String {
    binary("WARDEN_MAIL_BIN", "warden")
}

/// Git binary (default: `git`).
pub fn git_bin() -> String {
    binary("WARDEN_GIT_BIN", "git")
}

/// Pane poll interval while waiting for the assistant (default: 200ms).
pub fn pane_poll_interval() -> Duration {
    std::env::var("WARDEN_PANE_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(200))
}
