// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One heartbeat: ensure pass, lifecycle inbox, detectors.
//!
//! Every step handles its own errors; a heartbeat always completes.

use crate::detect::DetectorReport;
use crate::lifecycle::LifecycleReport;
use crate::runtime::Engine;
use warden_adapters::{GitAdapter, IssueStore, MailAdapter, SessionAdapter};
use warden_core::{AgentIdentity, Clock, Workspace};

/// Summary of one heartbeat, logged as a single line by the daemon
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeartbeatReport {
    /// Singleton and per-group agents (re)started by the ensure pass
    pub ensured: usize,
    pub lifecycle: LifecycleReport,
    pub detectors: DetectorReport,
}

impl<S, I, M, G, C> Engine<S, I, M, G, C>
where
    S: SessionAdapter,
    I: IssueStore,
    M: MailAdapter,
    G: GitAdapter,
    C: Clock,
{
    pub async fn heartbeat(&self, workspace: &Workspace) -> HeartbeatReport {
        for (group, error) in &workspace.invalid_groups {
            tracing::warn!(%group, %error, "skipping group with invalid config");
        }

        let ensured = self.ensure_agents(workspace).await;

        let lifecycle = match self.process_lifecycle(workspace).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "lifecycle pass failed");
                LifecycleReport::default()
            }
        };

        let detectors = self.run_detectors(workspace).await;

        let report = HeartbeatReport {
            ensured,
            lifecycle,
            detectors,
        };
        tracing::info!(
            ensured = report.ensured,
            lifecycle_executed = report.lifecycle.executed,
            lifecycle_failed = report.lifecycle.failed,
            lifecycle_stale = report.lifecycle.stale,
            crashed = report.detectors.crashed,
            restarted = report.detectors.restarted,
            stalled = report.detectors.stalled,
            orphaned = report.detectors.orphaned,
            alarms = report.detectors.alarms,
            "heartbeat complete",
        );
        report
    }

    /// Restart every required agent whose assistant is not running
    async fn ensure_agents(&self, workspace: &Workspace) -> usize {
        let naming = workspace.naming();
        let mut ensured = 0;

        for id in required_agents(workspace) {
            if self.cancel.is_cancelled() {
                break;
            }
            let session = naming.session_name(&id);
            let running = match self.sessions.has_session(&session).await {
                Ok(true) => self
                    .sessions
                    .is_assistant_alive(&session)
                    .await
                    .unwrap_or(false),
                Ok(false) => false,
                Err(e) => {
                    tracing::warn!(%session, error = %e, "cannot query session");
                    continue;
                }
            };
            if running {
                continue;
            }

            match self.restart(workspace, &id).await {
                Ok(_) => {
                    tracing::info!(identity = %id, %session, "ensured agent");
                    ensured += 1;
                }
                Err(e) if e.is_soft() => tracing::info!(identity = %id, reason = %e, "not ensured"),
                Err(e) => tracing::warn!(identity = %id, error = %e, "failed to ensure agent"),
            }
        }
        ensured
    }
}

/// Agents that must always be running
pub fn required_agents(workspace: &Workspace) -> Vec<AgentIdentity> {
    let mut agents = vec![AgentIdentity::Coordinator];
    if workspace.config.ensure_overseer {
        agents.push(AgentIdentity::Overseer);
    }
    for (group, config) in &workspace.groups {
        if config.non_operational_reason().is_some() {
            continue;
        }
        agents.push(AgentIdentity::observer(group.as_str()));
        agents.push(AgentIdentity::merger(group.as_str()));
    }
    agents
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
