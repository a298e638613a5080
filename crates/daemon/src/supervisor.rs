// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-tick orchestration.
//!
//! Configuration is re-read on every tick so group changes on disk apply
//! without a restart. A tick that cannot load the workspace is skipped.

use std::path::{Path, PathBuf};

use chrono::Utc;
use warden_adapters::{
    BdIssueStore, CliGitAdapter, CliMailAdapter, GitAdapter, IssueStore, MailAdapter,
    SessionAdapter, TmuxAdapter, TracedSession,
};
use warden_core::{Clock, SystemClock, Workspace};
use warden_engine::{Engine, HeartbeatReport, LifecycleReport};

use crate::lifecycle::DaemonState;

/// Engine with the production adapters
pub type DaemonEngine =
    Engine<TracedSession<TmuxAdapter>, BdIssueStore, CliMailAdapter, CliGitAdapter, SystemClock>;

pub struct Supervisor<S, I, M, G, C: Clock> {
    engine: Engine<S, I, M, G, C>,
    root: PathBuf,
}

impl<S, I, M, G, C> Supervisor<S, I, M, G, C>
where
    S: SessionAdapter,
    I: IssueStore,
    M: MailAdapter,
    G: GitAdapter,
    C: Clock,
{
    pub fn new(engine: Engine<S, I, M, G, C>, root: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            root: root.into(),
        }
    }

    pub fn engine(&self) -> &Engine<S, I, M, G, C> {
        &self.engine
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Timer tick: full heartbeat, then persist the heartbeat record
    pub async fn heartbeat(&self, state: &mut DaemonState) -> Option<HeartbeatReport> {
        let workspace = self.load_workspace()?;
        let report = self.engine.heartbeat(&workspace).await;
        state.record_heartbeat(Utc::now());
        Some(report)
    }

    /// Lifecycle kick: drain the lifecycle inbox only
    pub async fn lifecycle(&self) -> Option<LifecycleReport> {
        let workspace = self.load_workspace()?;
        match self.engine.process_lifecycle(&workspace).await {
            Ok(report) => {
                tracing::info!(
                    executed = report.executed,
                    failed = report.failed,
                    stale = report.stale,
                    malformed = report.malformed,
                    unclaimed = report.unclaimed,
                    "lifecycle kick complete",
                );
                Some(report)
            }
            Err(e) => {
                tracing::warn!(error = %e, "lifecycle kick failed");
                None
            }
        }
    }

    fn load_workspace(&self) -> Option<Workspace> {
        match Workspace::load(&self.root) {
            Ok(workspace) => Some(workspace),
            Err(e) => {
                tracing::warn!(
                    root = %self.root.display(),
                    error = %e,
                    "cannot load workspace config, skipping tick",
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
