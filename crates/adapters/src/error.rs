// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors shared by every external-CLI adapter

use std::time::Duration;
use thiserror::Error;

/// Failure of one adapter operation. Callers choose the recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("external binary missing: {0}")]
    ExternalBinaryMissing(String),
    #[error("{command} failed (exit {}): {stderr}", exit_label(.exit))]
    ExternalError {
        command: String,
        stderr: String,
        exit: Option<i32>,
    },
    #[error("{command} timed out after {}ms", .after.as_millis())]
    Timeout { command: String, after: Duration },
    #[error("{0} cancelled by shutdown")]
    Cancelled(String),
}

fn exit_label(exit: &Option<i32>) -> String {
    exit.map_or_else(|| "signal".to_string(), |code| code.to_string())
}

impl AdapterError {
    /// Classify an io error from spawning `command`
    pub fn from_spawn(command: &str, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::ExternalBinaryMissing(command.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(command.to_string()),
            _ => Self::ExternalError {
                command: command.to_string(),
                stderr: err.to_string(),
                exit: None,
            },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
