// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{GroupConfig, Issue, Message, Workspace, WorkspaceConfig};
use chrono::{TimeZone, Utc};
use std::path::Path;

/// Workspace with one operational group `grp` and default prefixes
pub fn workspace(root: &Path) -> Workspace {
    Workspace::new(root, WorkspaceConfig::default()).with_group("grp", GroupConfig::default())
}

/// Agent record with `work` assigned, last updated at `updated_ms`
pub fn agent_issue(id: &str, work: Option<&str>, updated_ms: u64) -> Issue {
    let mut issue = Issue::new(id);
    issue.issue_type = "agent".to_string();
    issue.assigned_work = work.map(str::to_string);
    issue.updated_at = Utc.timestamp_millis_opt(updated_ms as i64).single();
    issue.description = "cleanup_state: clean".to_string();
    issue
}

/// Unread message sent at `sent_ms`
pub fn message(id: &str, from: &str, subject: &str, body: &str, sent_ms: u64) -> Message {
    Message {
        id: id.to_string(),
        from: from.to_string(),
        to: "coordinator".to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        timestamp: Utc.timestamp_millis_opt(sent_ms as i64).single(),
        read: false,
    }
}
