// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue-store records and the agent view of them.
//!
//! The daemon never writes these; agents update their own records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One issue as returned by the issue-store CLI. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "issue_type", alias = "type")]
    pub issue_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "hook_bead")]
    pub assigned_work: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            status: "open".to_string(),
            issue_type: String::new(),
            description: String::new(),
            assigned_work: None,
            updated_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status != "closed"
    }
}

/// Worktree cleanliness an agent reports in its record description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CleanupState {
    Clean,
    HasUncommitted,
    HasStash,
    HasUnpushed,
    #[default]
    Unknown,
}

impl CleanupState {
    /// Read the `cleanup_state: <value>` line of a description
    pub fn from_description(description: &str) -> Self {
        description
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim() == "cleanup_state")
            .map(|(_, value)| Self::from_value(value.trim()))
            .unwrap_or_default()
    }

    fn from_value(value: &str) -> Self {
        match value {
            "clean" => Self::Clean,
            "has_uncommitted" => Self::HasUncommitted,
            "has_stash" => Self::HasStash,
            "has_unpushed" => Self::HasUnpushed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::HasUncommitted => "has_uncommitted",
            Self::HasStash => "has_stash",
            Self::HasUnpushed => "has_unpushed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CleanupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of an agent's record the detectors read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRecord {
    pub id: String,
    /// Empty ids are normalised to `None`
    pub assigned_work: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub cleanup_state: CleanupState,
}

impl AgentRecord {
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            id: issue.id.clone(),
            assigned_work: issue
                .assigned_work
                .as_deref()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string),
            updated_at: issue.updated_at,
            cleanup_state: CleanupState::from_description(&issue.description),
        }
    }

    pub fn has_work(&self) -> bool {
        self.assigned_work.is_some()
    }

    /// Time since the last update; `None` if unknown or in the future
    pub fn idle_ms(&self, now_ms: u64) -> Option<u64> {
        let updated = u64::try_from(self.updated_at?.timestamp_millis()).ok()?;
        now_ms.checked_sub(updated)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
