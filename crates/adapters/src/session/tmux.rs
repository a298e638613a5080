// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux session adapter

use super::{is_shell_command, SessionAdapter};
use crate::error::AdapterError;
use crate::subprocess::{run_cancellable, stderr_of, stdout_of, TMUX_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use warden_core::SessionTheme;

/// Pause between typing a nudge and pressing Enter, so the assistant's
/// input box takes the text as one paste before submission
const NUDGE_SUBMIT_DELAY: Duration = Duration::from_millis(500);

/// Tmux-based session adapter
#[derive(Clone)]
pub struct TmuxAdapter {
    bin: String,
    cancel: CancellationToken,
}

impl Default for TmuxAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TmuxAdapter {
    pub fn new() -> Self {
        Self {
            bin: crate::env::tmux_bin(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_binary(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    /// Abandon in-flight commands when `cancel` fires
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run a tmux command, returning the raw output whatever the exit status
    async fn raw(&self, args: &[&str], description: &str) -> Result<Output, AdapterError> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args);
        run_cancellable(cmd, TMUX_TIMEOUT, description, &self.cancel).await
    }

    /// Run a tmux command; a missing session becomes `NotFound`
    async fn run(&self, args: &[&str], description: &str) -> Result<Output, AdapterError> {
        let output = self.raw(args, description).await?;
        if output.status.success() {
            return Ok(output);
        }
        let stderr = stderr_of(&output);
        if is_missing_session(&stderr) {
            let target = args
                .windows(2)
                .find(|w| w[0] == "-t")
                .map(|w| w[1])
                .unwrap_or("unknown");
            return Err(AdapterError::NotFound(target.to_string()));
        }
        Err(AdapterError::ExternalError {
            command: description.to_string(),
            stderr,
            exit: output.status.code(),
        })
    }

    /// Foreground command of the session's active pane
    async fn pane_command(&self, name: &str) -> Result<String, AdapterError> {
        let target = pane(name);
        let output = self
            .run(
                &["display-message", "-p", "-t", &target, "#{pane_current_command}"],
                "tmux display-message",
            )
            .await?;
        Ok(stdout_of(&output))
    }

    /// Set a tmux option (non-fatal on failure; the session works even if styling fails).
    async fn set_option(&self, name: &str, option: &str, value: &str) {
        let target = exact(name);
        match self
            .run(&["set-option", "-t", &target, option, value], "tmux set-option")
            .await
        {
            Ok(_) => {}
            Err(e) => tracing::warn!(session = name, option, value, error = %e, "tmux set-option failed"),
        }
    }
}

/// Exact-match session target so `grp-n1` never resolves to `grp-n10`
fn exact(name: &str) -> String {
    format!("={name}")
}

/// Exact-match target for the active pane of a session
fn pane(name: &str) -> String {
    format!("={name}:")
}

fn is_missing_session(stderr: &str) -> bool {
    stderr.contains("can't find")
        || stderr.contains("session not found")
        || stderr.contains("no server running")
        || stderr.contains("error connecting to")
}

#[async_trait]
impl SessionAdapter for TmuxAdapter {
    async fn has_session(&self, name: &str) -> Result<bool, AdapterError> {
        let target = exact(name);
        let output = self
            .raw(&["has-session", "-t", &target], "tmux has-session")
            .await?;
        Ok(output.status.success())
    }

    async fn is_assistant_alive(&self, name: &str) -> Result<bool, AdapterError> {
        match self.pane_command(name).await {
            Ok(command) => Ok(!is_shell_command(&command)),
            Err(AdapterError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn kill_session(&self, name: &str) -> Result<(), AdapterError> {
        let target = exact(name);
        match self
            .run(&["kill-session", "-t", &target], "tmux kill-session")
            .await
        {
            Ok(_) | Err(AdapterError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn new_session(
        &self,
        name: &str,
        cwd: &Path,
        initial_command: Option<&str>,
    ) -> Result<(), AdapterError> {
        // Precondition: cwd must exist
        if !cwd.is_dir() {
            return Err(AdapterError::NotFound(cwd.display().to_string()));
        }

        let cwd = cwd.to_string_lossy();
        let mut args = vec!["new-session", "-d", "-s", name, "-c", cwd.as_ref()];
        if let Some(command) = initial_command {
            args.push(command);
        }
        let output = self.run(&args, "tmux new-session").await?;

        // Log stderr even on success - may contain useful warnings
        if !output.stderr.is_empty() {
            tracing::warn!(session = name, stderr = %stderr_of(&output), "tmux new-session stderr (non-fatal)");
        }
        Ok(())
    }

    async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<(), AdapterError> {
        let target = exact(name);
        self.run(
            &["set-environment", "-t", &target, key, value],
            "tmux set-environment",
        )
        .await
        .map(|_| ())
    }

    async fn send_keys(&self, name: &str, text: &str) -> Result<(), AdapterError> {
        let target = pane(name);
        // -l = literal mode (no key name interpretation)
        // -- = end of options (handles text starting with -)
        self.run(
            &["send-keys", "-t", &target, "-l", "--", text],
            "tmux send-keys literal",
        )
        .await?;
        self.press(name, "Enter").await
    }

    async fn signal(&self, name: &str, text: &str) -> Result<(), AdapterError> {
        let target = pane(name);
        let line = text.replace(['\r', '\n'], " ");
        self.run(
            &["send-keys", "-t", &target, "-l", "--", &line],
            "tmux send-keys nudge",
        )
        .await?;
        tokio::select! {
            _ = self.cancel.cancelled() => {
                return Err(AdapterError::Cancelled("tmux send-keys nudge".to_string()))
            }
            _ = tokio::time::sleep(NUDGE_SUBMIT_DELAY) => {}
        }
        self.press(name, "Enter").await
    }

    async fn press(&self, name: &str, key: &str) -> Result<(), AdapterError> {
        let target = pane(name);
        self.run(&["send-keys", "-t", &target, key], "tmux send-keys")
            .await
            .map(|_| ())
    }

    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, AdapterError> {
        let target = pane(name);
        let start = format!("-{lines}");
        let output = self
            .run(
                &["capture-pane", "-p", "-t", &target, "-S", &start],
                "tmux capture-pane",
            )
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn wait_for_shell_ready(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<(), AdapterError> {
        let interval = crate::env::pane_poll_interval();
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.is_assistant_alive(name).await? {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(AdapterError::Timeout {
                    command: format!("waiting for assistant in {name}"),
                    after: timeout,
                });
            }
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    return Err(AdapterError::Cancelled(format!("waiting for assistant in {name}")))
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    async fn set_theme(&self, name: &str, theme: &SessionTheme) -> Result<(), AdapterError> {
        self.set_option(name, "status-style", &format!("bg={},fg=black", theme.color))
            .await;
        if let Some(ref title) = theme.title {
            self.set_option(name, "set-titles", "on").await;
            self.set_option(name, "set-titles-string", title).await;
            self.set_option(name, "status-left", &format!(" {title} ")).await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
