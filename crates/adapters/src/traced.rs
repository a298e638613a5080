// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::error::AdapterError;
use crate::session::SessionAdapter;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::Instrument;
use warden_core::SessionTheme;

/// Wrapper that adds tracing to any SessionAdapter
#[derive(Clone)]
pub struct TracedSession<S> {
    inner: S,
}

impl<S> TracedSession<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SessionAdapter> SessionAdapter for TracedSession<S> {
    async fn has_session(&self, name: &str) -> Result<bool, AdapterError> {
        let result = self.inner.has_session(name).await;
        tracing::trace!(session = name, exists = ?result.as_ref().ok(), "checked");
        result
    }

    async fn is_assistant_alive(&self, name: &str) -> Result<bool, AdapterError> {
        let result = self.inner.is_assistant_alive(name).await;
        tracing::trace!(session = name, alive = ?result.as_ref().ok(), "checked");
        result
    }

    async fn kill_session(&self, name: &str) -> Result<(), AdapterError> {
        let result = self.inner.kill_session(name).await;
        tracing::info_span!("session.kill", session = name).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed"),
        });
        result
    }

    async fn new_session(
        &self,
        name: &str,
        cwd: &Path,
        initial_command: Option<&str>,
    ) -> Result<(), AdapterError> {
        async {
            tracing::info!(initial_command, "starting");
            let start = std::time::Instant::now();
            let result = self.inner.new_session(name, cwd, initial_command).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "session created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "new session failed"),
            }
            result
        }
        .instrument(tracing::info_span!("session.new", session = name, cwd = %cwd.display()))
        .await
    }

    async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<(), AdapterError> {
        let result = self.inner.set_env(name, key, value).await;
        if let Err(ref e) = result {
            tracing::warn!(session = name, key, error = %e, "set_env failed");
        }
        result
    }

    async fn send_keys(&self, name: &str, text: &str) -> Result<(), AdapterError> {
        tracing::info_span!("session.send_keys", session = name)
            .in_scope(|| tracing::debug!(text_len = text.len(), "sending"));
        let result = self.inner.send_keys(name, text).await;
        if let Err(ref e) = result {
            tracing::error!(session = name, error = %e, "send_keys failed");
        }
        result
    }

    async fn signal(&self, name: &str, text: &str) -> Result<(), AdapterError> {
        let result = self.inner.signal(name, text).await;
        match &result {
            Ok(()) => tracing::debug!(session = name, text_len = text.len(), "nudged"),
            Err(e) => tracing::warn!(session = name, error = %e, "nudge failed"),
        }
        result
    }

    async fn press(&self, name: &str, key: &str) -> Result<(), AdapterError> {
        self.inner.press(name, key).await
    }

    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, AdapterError> {
        let result = self.inner.capture_pane(name, lines).await;
        tracing::trace!(
            session = name,
            lines,
            captured_len = result.as_ref().map(|s| s.len()).ok(),
            "captured"
        );
        result
    }

    async fn wait_for_shell_ready(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<(), AdapterError> {
        let start = std::time::Instant::now();
        let result = self.inner.wait_for_shell_ready(name, timeout).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => tracing::info!(session = name, elapsed_ms, "assistant ready"),
            Err(e) => tracing::warn!(session = name, elapsed_ms, error = %e, "assistant not ready"),
        }
        result
    }

    async fn set_theme(&self, name: &str, theme: &SessionTheme) -> Result<(), AdapterError> {
        self.inner.set_theme(name, theme).await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
