// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash, stall and orphan detectors.
//!
//! Classification is a pure function of observed session state and the
//! agent's declared record. The passes then run in a fixed order over all
//! named agents: crashes first, then stalls, then orphans.

use crate::runtime::Engine;
use std::time::Duration;
use warden_adapters::{GitAdapter, IssueStore, MailAdapter, SessionAdapter};
use warden_core::{
    AgentIdentity, AgentRecord, Clock, GroupStatus, OutgoingMessage, Priority, Workspace,
};

/// Assigned work with no record update for this long is a stall
pub const STALL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// What the multiplexer says about an agent's session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub session_exists: bool,
    pub assistant_alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentHealth {
    Healthy,
    /// No session while work is assigned
    Crashed,
    /// Alive with work, but the record has not moved in the stall timeout
    Stalled,
    /// Session shell survives, assistant gone, work assigned
    Orphaned,
}

/// Classify one agent.
///
/// No assigned work means healthy regardless of session state. An
/// `updated_at` in the future (clock skew) never counts as stalled.
pub fn classify(
    observed: Observation,
    record: &AgentRecord,
    now_ms: u64,
    stall_timeout: Duration,
) -> AgentHealth {
    if !record.has_work() {
        return AgentHealth::Healthy;
    }
    if !observed.session_exists {
        return AgentHealth::Crashed;
    }
    if !observed.assistant_alive {
        return AgentHealth::Orphaned;
    }
    match record.idle_ms(now_ms) {
        Some(idle) if u128::from(idle) > stall_timeout.as_millis() => AgentHealth::Stalled,
        _ => AgentHealth::Healthy,
    }
}

/// Counts from one detector run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetectorReport {
    pub checked: usize,
    pub crashed: usize,
    pub restarted: usize,
    pub stalled: usize,
    pub orphaned: usize,
    pub alarms: usize,
    pub notified: usize,
    /// Agents named in a mass-death alarm raised during this run
    pub mass_death: Vec<AgentIdentity>,
}

struct Finding {
    id: AgentIdentity,
    session: String,
    record: AgentRecord,
    health: AgentHealth,
}

impl<S, I, M, G, C> Engine<S, I, M, G, C>
where
    S: SessionAdapter,
    I: IssueStore,
    M: MailAdapter,
    G: GitAdapter,
    C: Clock,
{
    /// Run the three detectors over every named agent of operational groups
    pub async fn run_detectors(&self, workspace: &Workspace) -> DetectorReport {
        let mut report = DetectorReport::default();
        let findings = self.survey(workspace, &mut report).await;

        for finding in findings.iter().filter(|f| f.health == AgentHealth::Crashed) {
            report.crashed += 1;
            self.handle_crash(workspace, finding, &mut report).await;
        }
        for finding in findings.iter().filter(|f| f.health == AgentHealth::Stalled) {
            report.stalled += 1;
            let idle_min = finding
                .record
                .idle_ms(self.clock.epoch_ms())
                .map_or(0, |ms| ms / 60_000);
            let body = format!(
                "session {} has work {} but no progress for {idle_min} minutes",
                finding.session,
                work_of(&finding.record),
            );
            self.notify(&finding.id, "STALLED", body, Priority::Normal, &mut report)
                .await;
        }
        for finding in findings.iter().filter(|f| f.health == AgentHealth::Orphaned) {
            report.orphaned += 1;
            let body = format!(
                "session {} has no running assistant but holds work {}; reassign manually",
                finding.session,
                work_of(&finding.record),
            );
            self.notify(&finding.id, "ORPHANED", body, Priority::Normal, &mut report)
                .await;
        }

        report
    }

    /// Observe and classify every agent; unreadable records are skipped
    async fn survey(&self, workspace: &Workspace, report: &mut DetectorReport) -> Vec<Finding> {
        let naming = workspace.naming();
        let mut findings = Vec::new();

        for (group, config) in &workspace.groups {
            if config.status != GroupStatus::Operational {
                continue;
            }
            let roster = match workspace.roster(group) {
                Ok(roster) => roster,
                Err(e) => {
                    tracing::warn!(%group, error = %e, "cannot list agents");
                    continue;
                }
            };

            for id in roster {
                let record_id = naming.record_id(&id);
                let record = match self.issues.show(&record_id).await {
                    Ok(Some(issue)) => AgentRecord::from_issue(&issue),
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::debug!(identity = %id, error = %e, "agent record unreadable, skipping");
                        continue;
                    }
                };
                if !record.has_work() {
                    continue;
                }

                let session = naming.session_name(&id);
                let observed = match self.observe(&session).await {
                    Ok(observed) => observed,
                    Err(e) => {
                        tracing::warn!(%session, error = %e, "cannot observe session");
                        continue;
                    }
                };
                report.checked += 1;
                let health = classify(
                    observed,
                    &record,
                    self.clock.epoch_ms(),
                    self.config.stall_timeout,
                );
                findings.push(Finding {
                    id,
                    session,
                    record,
                    health,
                });
            }
        }
        findings
    }

    async fn observe(&self, session: &str) -> Result<Observation, warden_adapters::AdapterError> {
        let session_exists = self.sessions.has_session(session).await?;
        let assistant_alive =
            session_exists && self.sessions.is_assistant_alive(session).await?;
        Ok(Observation {
            session_exists,
            assistant_alive,
        })
    }

    async fn handle_crash(
        &self,
        workspace: &Workspace,
        finding: &Finding,
        report: &mut DetectorReport,
    ) {
        let session = &finding.session;
        tracing::warn!(%session, identity = %finding.id, work = work_of(&finding.record), "session crashed with work assigned");
        if let Some(mass) = self.alarm.observe(session, self.clock.epoch_ms()) {
            report.alarms += 1;
            let naming = workspace.naming();
            for dead in &mass.sessions {
                match naming.identity_for_session(dead) {
                    Ok(id) => report.mass_death.push(id),
                    Err(e) => tracing::debug!(session = %dead, error = %e, "dead session has no identity"),
                }
            }
            tracing::warn!(
                agents = ?report.mass_death.iter().map(AgentIdentity::address).collect::<Vec<_>>(),
                "agents lost in mass session death",
            );
        }

        match self.restart(workspace, &finding.id).await {
            Ok(_) => report.restarted += 1,
            Err(e) if e.is_soft() => tracing::info!(%session, reason = %e, "crash not restarted"),
            Err(e) => {
                tracing::error!(%session, error = %e, "crash restart failed");
                let body = format!(
                    "session {session} died holding work {} and could not be restarted: {e}",
                    work_of(&finding.record),
                );
                self.notify(&finding.id, "CRASHED", body, Priority::High, report)
                    .await;
            }
        }
    }

    /// Mail the agent's group observer; failures are logged only
    async fn notify(
        &self,
        id: &AgentIdentity,
        kind: &str,
        body: String,
        priority: Priority,
        report: &mut DetectorReport,
    ) {
        let Some(observer) = id.group_observer() else {
            return;
        };
        let message = OutgoingMessage::new(
            observer.address(),
            format!("{kind}: {}", id.address()),
            body,
        )
        .priority(priority);
        match self.mail.send(&message).await {
            Ok(()) => report.notified += 1,
            Err(e) => tracing::warn!(to = %observer, error = %e, "observer notification failed"),
        }
    }
}

fn work_of(record: &AgentRecord) -> &str {
    record.assigned_work.as_deref().unwrap_or("")
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
