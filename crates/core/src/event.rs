// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity events from the issue store's follow stream.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("malformed event: {0}")]
    Malformed(String),
}

/// One line of the newline-delimited JSON event stream
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub issue_id: String,
    #[serde(default)]
    pub new_status: Option<String>,
}

impl ActivityEvent {
    /// Parse one stream line. `type` and `issue_id` are required.
    pub fn parse_line(line: &str) -> Result<Self, EventError> {
        serde_json::from_str(line.trim()).map_err(|e| EventError::Malformed(e.to_string()))
    }

    /// A status change to `closed`
    pub fn is_close(&self) -> bool {
        self.kind == "status" && self.new_status.as_deref() == Some("closed")
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
