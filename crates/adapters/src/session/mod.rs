// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal-multiplexer session adapters

mod tmux;

pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, SessionCall};

use crate::error::AdapterError;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use warden_core::SessionTheme;

/// Pane commands that mean "no assistant, just a shell"
pub const SHELL_COMMANDS: &[&str] = &["bash", "zsh", "sh", "fish", "dash", "ksh", "tcsh", "login"];

/// Whether a pane's foreground command is a bare shell
pub fn is_shell_command(command: &str) -> bool {
    let command = command.trim().trim_start_matches('-');
    command.is_empty() || SHELL_COMMANDS.contains(&command)
}

/// Adapter over the terminal multiplexer.
///
/// A session *existing* and the assistant inside it being *alive* are
/// separate facts: a session whose assistant exited still exists, with a
/// shell in the pane.
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    /// Whether a session with this name exists
    async fn has_session(&self, name: &str) -> Result<bool, AdapterError>;

    /// Whether the pane runs something other than a bare shell.
    /// A missing session is not alive.
    async fn is_assistant_alive(&self, name: &str) -> Result<bool, AdapterError>;

    /// Kill a session; killing a missing session succeeds
    async fn kill_session(&self, name: &str) -> Result<(), AdapterError>;

    /// Create a detached session in `cwd`, optionally running `initial_command`
    async fn new_session(
        &self,
        name: &str,
        cwd: &Path,
        initial_command: Option<&str>,
    ) -> Result<(), AdapterError>;

    /// Set a variable in the session environment
    async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<(), AdapterError>;

    /// Type `text` literally, then press Enter
    async fn send_keys(&self, name: &str, text: &str) -> Result<(), AdapterError>;

    /// Deliver a single-line prompt to the running assistant
    async fn signal(&self, name: &str, text: &str) -> Result<(), AdapterError>;

    /// Press a named key (`Enter`, `Down`, ...)
    async fn press(&self, name: &str, key: &str) -> Result<(), AdapterError>;

    /// Last `lines` lines of the pane
    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, AdapterError>;

    /// Wait until the launched assistant has taken over the pane.
    ///
    /// Fails with [`AdapterError::Timeout`] when `timeout` elapses first.
    async fn wait_for_shell_ready(&self, name: &str, timeout: Duration)
        -> Result<(), AdapterError>;

    /// Apply cosmetic styling. Default implementation is a no-op.
    async fn set_theme(&self, _name: &str, _theme: &SessionTheme) -> Result<(), AdapterError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
