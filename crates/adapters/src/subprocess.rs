// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use crate::error::AdapterError;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Default timeout for tmux commands.
pub const TMUX_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for issue-store queries.
pub const ISSUES_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for mailbox commands.
pub const MAIL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for local git commands.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for git commands that talk to a remote.
pub const GIT_REMOTE_TIMEOUT: Duration = Duration::from_secs(120);

/// Default timeout for the aggregate-completion command.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Run a subprocess command with a timeout.
///
/// A non-zero exit is not an error here; use [`check_status`] for that.
/// The child is killed if the timeout elapses.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, AdapterError> {
    cmd.stdin(Stdio::null()).kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(AdapterError::from_spawn(description, &io_err)),
        Err(_elapsed) => Err(AdapterError::Timeout {
            command: description.to_string(),
            after: timeout,
        }),
    }
}

/// [`run_with_timeout`], abandoned (and the child killed) on cancellation
pub async fn run_cancellable(
    cmd: Command,
    timeout: Duration,
    description: &str,
    cancel: &CancellationToken,
) -> Result<Output, AdapterError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AdapterError::Cancelled(description.to_string())),
        result = run_with_timeout(cmd, timeout, description) => result,
    }
}

/// Turn a non-zero exit into [`AdapterError::ExternalError`]
pub fn check_status(output: Output, description: &str) -> Result<Output, AdapterError> {
    if output.status.success() {
        return Ok(output);
    }
    Err(AdapterError::ExternalError {
        command: description.to_string(),
        stderr: stderr_of(&output),
        exit: output.status.code(),
    })
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
