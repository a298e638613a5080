// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-restart protocol.
//!
//! Rebuilds a clean session for an identity, exports its environment in the
//! parent shell, launches the assistant and sends the two startup nudges.
//! Re-running it on a healthy session only reinforces desired state: the
//! session is kept and only env, theme and nudges are re-applied.

use crate::env::{session_env, startup_command};
use crate::error::RestartError;
use crate::nudge::{predecessor_nudge, propulsion_nudge};
use crate::prompts::accept_permissions_dialog;
use crate::runtime::Engine;
use std::path::Path;
use std::time::Duration;
use warden_adapters::{GitAdapter, IssueStore, MailAdapter, SessionAdapter};
use warden_core::{AgentIdentity, Clock, GroupConfig, Workspace};

/// Fixed waits used by the protocol
#[derive(Debug, Clone)]
pub struct RestartTimings {
    /// Upper bound for the assistant to come up after the startup command
    pub ready_timeout: Duration,
    /// Polls for the permissions dialog
    pub dialog_attempts: usize,
    pub dialog_interval: Duration,
    /// Settle time after launch before the first nudge
    pub settle: Duration,
    /// Gap between the two nudges so each is its own prompt
    pub nudge_gap: Duration,
}

impl Default for RestartTimings {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(60),
            dialog_attempts: 10,
            dialog_interval: Duration::from_millis(500),
            settle: Duration::from_secs(3),
            nudge_gap: Duration::from_secs(2),
        }
    }
}

impl RestartTimings {
    /// No waiting at all, for tests driven by fakes
    pub fn immediate() -> Self {
        Self {
            ready_timeout: Duration::ZERO,
            dialog_attempts: 1,
            dialog_interval: Duration::ZERO,
            settle: Duration::ZERO,
            nudge_gap: Duration::ZERO,
        }
    }
}

/// What the protocol did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    /// A new session was created and the assistant launched
    Started,
    /// The session was already healthy; env, theme and nudges re-applied
    Refreshed,
}

impl<S, I, M, G, C> Engine<S, I, M, G, C>
where
    S: SessionAdapter,
    I: IssueStore,
    M: MailAdapter,
    G: GitAdapter,
    C: Clock,
{
    /// Run the restart protocol for `id`
    pub async fn restart(
        &self,
        workspace: &Workspace,
        id: &AgentIdentity,
    ) -> Result<RestartOutcome, RestartError> {
        let naming = workspace.naming();
        let session = naming.session_name(id);
        let work_dir = naming.work_dir(id);
        let env = session_env(workspace, id);

        let group = match id.group() {
            Some(name) => {
                let group = workspace
                    .group(name)
                    .ok_or_else(|| RestartError::UnknownGroup(name.to_string()))?;
                if let Some(reason) = group.non_operational_reason() {
                    return Err(RestartError::NonOperational {
                        identity: id.address(),
                        reason,
                    });
                }
                Some((name, group))
            }
            None => None,
        };

        if let Some((_, group)) = group {
            if id.role().persists_clone() && work_dir.join(".git").exists() {
                self.pre_sync(id, &work_dir, group).await?;
            }
        }

        // Exists and alive are distinct: a live shell with a dead assistant
        // is rebuilt, a live assistant is left alone.
        let exists = self.sessions.has_session(&session).await?;
        let healthy = exists && self.sessions.is_assistant_alive(&session).await?;
        if exists && !healthy {
            tracing::info!(%session, identity = %id, "assistant dead, rebuilding session");
            self.sessions.kill_session(&session).await?;
        }
        if !healthy {
            tokio::fs::create_dir_all(&work_dir)
                .await
                .map_err(|source| RestartError::WorkDir {
                    path: work_dir.clone(),
                    source,
                })?;
            self.sessions.new_session(&session, &work_dir, None).await?;
        }

        for (key, value) in &env {
            self.sessions.set_env(&session, key, value).await?;
        }

        if let Some((name, group)) = group {
            if let Err(e) = self.sessions.set_theme(&session, &group.theme_for(name)).await {
                tracing::warn!(%session, error = %e, "failed to apply theme (non-fatal)");
            }
        }

        if !healthy {
            self.launch(workspace, &session, &env).await?;
        }

        self.send_nudges(id, &session).await?;

        let outcome = if healthy {
            RestartOutcome::Refreshed
        } else {
            RestartOutcome::Started
        };
        tracing::info!(%session, identity = %id, ?outcome, "restart protocol complete");
        Ok(outcome)
    }

    /// Type the startup command and wait for the assistant to come up
    async fn launch(
        &self,
        workspace: &Workspace,
        session: &str,
        env: &[(String, String)],
    ) -> Result<(), RestartError> {
        let timings = &self.config.restart;
        let assistant = &workspace.config.assistant_command;
        self.sessions
            .send_keys(session, &startup_command(env, assistant))
            .await?;

        self.or_cancel(
            self.sessions
                .wait_for_shell_ready(session, timings.ready_timeout),
        )
        .await?
        .map_err(|source| RestartError::AssistantNotReady {
            session: session.to_string(),
            source,
        })?;

        if assistant.contains("--dangerously-skip-permissions") {
            let accepted = self
                .or_cancel(accept_permissions_dialog(
                    &self.sessions,
                    session,
                    timings.dialog_attempts,
                    timings.dialog_interval,
                ))
                .await?;
            match accepted {
                Ok(true) => tracing::info!(%session, "permissions dialog accepted"),
                Ok(false) => tracing::debug!(%session, "no permissions dialog"),
                Err(e) => tracing::warn!(%session, error = %e, "permissions dialog check failed"),
            }
        }

        self.pause(timings.settle).await
    }

    /// Both nudges are best-effort
    async fn send_nudges(&self, id: &AgentIdentity, session: &str) -> Result<(), RestartError> {
        if let Err(e) = self.sessions.signal(session, &predecessor_nudge(id)).await {
            tracing::warn!(%session, error = %e, "startup nudge failed (non-fatal)");
        }
        self.pause(self.config.restart.nudge_gap).await?;
        if let Err(e) = self.sessions.signal(session, &propulsion_nudge(id)).await {
            tracing::warn!(%session, error = %e, "propulsion nudge failed (non-fatal)");
        }
        Ok(())
    }

    /// Bring a persistent clone up to date before its agent starts.
    ///
    /// A failed fetch refuses the restart; a failed rebase is left for the
    /// agent to resolve.
    async fn pre_sync(
        &self,
        id: &AgentIdentity,
        dir: &Path,
        group: &GroupConfig,
    ) -> Result<(), RestartError> {
        let stale = |source| RestartError::StaleCodeRefused {
            identity: id.address(),
            source,
        };

        let remotes = self.git.remotes(dir).await.map_err(stale)?;
        let remote = if remotes.iter().any(|r| *r == group.remote) {
            group.remote.clone()
        } else if let Some(first) = remotes.first() {
            first.clone()
        } else {
            tracing::debug!(dir = %dir.display(), "no remotes, skipping pre-sync");
            return Ok(());
        };
        let branch = &group.default_branch;

        self.git.fetch(dir, &remote).await.map_err(stale)?;

        if let Err(e) = self.git.pull_rebase(dir, &remote, branch).await {
            tracing::warn!(
                identity = %id,
                dir = %dir.display(),
                error = %e,
                "pull --rebase failed, agent will resolve",
            );
            return Ok(());
        }

        let upstream = format!("{remote}/{branch}");
        match self.git.is_ancestor(dir, &upstream, "HEAD").await {
            Ok(true) => tracing::debug!(identity = %id, %upstream, "worktree up to date"),
            Ok(false) => tracing::warn!(identity = %id, %upstream, "worktree still behind upstream"),
            Err(e) => tracing::debug!(identity = %id, error = %e, "could not verify worktree"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "restart_tests.rs"]
mod tests;
