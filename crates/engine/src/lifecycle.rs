// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle-request processor.
//!
//! Drains the lifecycle inbox in mailbox order. Every request is claimed by
//! deleting its message before it is executed, so a failing execution is
//! never retried; the sender has to ask again.

use crate::error::{EngineError, RestartError};
use crate::runtime::Engine;
use warden_adapters::{GitAdapter, IssueStore, MailAdapter, SessionAdapter};
use warden_core::{AgentIdentity, Clock, LifecycleAction, LifecycleRequest, Triage, Workspace};

/// Counts from one pass over the inbox
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LifecycleReport {
    pub executed: usize,
    pub failed: usize,
    pub stale: usize,
    pub malformed: usize,
    /// Requests left in the inbox because the claim failed
    pub unclaimed: usize,
}

impl<S, I, M, G, C> Engine<S, I, M, G, C>
where
    S: SessionAdapter,
    I: IssueStore,
    M: MailAdapter,
    G: GitAdapter,
    C: Clock,
{
    /// Process every pending lifecycle request once
    pub async fn process_lifecycle(
        &self,
        workspace: &Workspace,
    ) -> Result<LifecycleReport, EngineError> {
        let inbox = AgentIdentity::parse(&workspace.config.lifecycle_inbox)?;
        let messages = self.mail.inbox(&inbox).await?;
        let mut report = LifecycleReport::default();

        for message in &messages {
            match Triage::classify(message, self.clock.epoch_ms()) {
                Triage::Ignore => {}
                Triage::Stale { message_id } => {
                    tracing::info!(%message_id, from = %message.from, "discarding stale lifecycle request");
                    self.discard(&message_id).await;
                    report.stale += 1;
                }
                Triage::Malformed { message_id, error } => {
                    tracing::warn!(%message_id, from = %message.from, %error, "discarding malformed lifecycle request");
                    self.discard(&message_id).await;
                    report.malformed += 1;
                }
                Triage::Execute(request) => {
                    if let Err(e) = self.mail.delete(&request.message_id).await {
                        tracing::warn!(
                            message_id = %request.message_id,
                            error = %e,
                            "could not claim lifecycle request, leaving it for next pass",
                        );
                        report.unclaimed += 1;
                        continue;
                    }
                    match self.execute(workspace, &request).await {
                        Ok(()) => report.executed += 1,
                        Err(e) if e.is_soft() => {
                            tracing::info!(message_id = %request.message_id, reason = %e, "lifecycle request refused");
                            report.executed += 1;
                        }
                        Err(e) => {
                            tracing::warn!(
                                message_id = %request.message_id,
                                sender = %request.sender,
                                action = request.action.as_str(),
                                error = %e,
                                "lifecycle request failed",
                            );
                            report.failed += 1;
                        }
                    }
                }
            }
        }

        Ok(report)
    }

    async fn discard(&self, message_id: &str) {
        if let Err(e) = self.mail.delete(message_id).await {
            tracing::warn!(%message_id, error = %e, "failed to delete lifecycle message");
        }
    }

    /// Act on a claimed request; the sender is the agent acted upon
    async fn execute(
        &self,
        workspace: &Workspace,
        request: &LifecycleRequest,
    ) -> Result<(), LifecycleFailure> {
        let id = AgentIdentity::parse(&request.sender)?;
        let session = workspace.naming().session_name(&id);
        tracing::info!(identity = %id, %session, action = request.action.as_str(), "executing lifecycle request");

        // Refuse before killing so an agent of a parked or unknown group keeps its session
        if request.action != LifecycleAction::Shutdown {
            if let Some(name) = id.group() {
                let group = workspace
                    .group(name)
                    .ok_or_else(|| RestartError::UnknownGroup(name.to_string()))?;
                if let Some(reason) = group.non_operational_reason() {
                    return Err(RestartError::NonOperational {
                        identity: id.address(),
                        reason,
                    }
                    .into());
                }
            }
        }

        if self.sessions.has_session(&session).await.map_err(RestartError::from)? {
            self.sessions
                .kill_session(&session)
                .await
                .map_err(RestartError::from)?;
        }
        match request.action {
            LifecycleAction::Shutdown => Ok(()),
            LifecycleAction::Restart | LifecycleAction::Cycle => {
                self.restart(workspace, &id).await?;
                Ok(())
            }
        }
    }
}

/// Why a claimed request did not execute
#[derive(Debug, thiserror::Error)]
enum LifecycleFailure {
    #[error("unknown sender: {0}")]
    Sender(#[from] warden_core::IdentityError),
    #[error(transparent)]
    Restart(#[from] RestartError),
}

impl LifecycleFailure {
    fn is_soft(&self) -> bool {
        matches!(self, LifecycleFailure::Restart(e) if e.is_soft())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
