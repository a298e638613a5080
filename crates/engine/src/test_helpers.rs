// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::{Engine, EngineConfig, EngineDeps, RestartTimings};
use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use warden_adapters::{FakeGitAdapter, FakeIssueStore, FakeMailAdapter, FakeSessionAdapter};
use warden_core::{test_support, AgentIdentity, FakeClock, Workspace};

/// Convenience alias for the fully-faked engine.
pub(crate) type TestEngine =
    Engine<FakeSessionAdapter, FakeIssueStore, FakeMailAdapter, FakeGitAdapter, FakeClock>;

/// Test context holding the engine, its fakes and a workspace on disk.
pub(crate) struct TestContext {
    pub engine: TestEngine,
    pub sessions: FakeSessionAdapter,
    pub issues: FakeIssueStore,
    pub mail: FakeMailAdapter,
    pub git: FakeGitAdapter,
    pub clock: FakeClock,
    pub cancel: CancellationToken,
    pub workspace: Workspace,
    _dir: TempDir,
}

impl TestContext {
    /// Workspace with group `grp` and no waits in the restart protocol
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let workspace = test_support::workspace(dir.path());
        Self::with_workspace(dir, workspace)
    }

    pub fn with_workspace(dir: TempDir, workspace: Workspace) -> Self {
        let sessions = FakeSessionAdapter::new();
        let issues = FakeIssueStore::new();
        let mail = FakeMailAdapter::new();
        let git = FakeGitAdapter::new();
        let clock = FakeClock::new();
        let cancel = CancellationToken::new();
        let engine = Engine::new(
            EngineDeps {
                sessions: sessions.clone(),
                issues: issues.clone(),
                mail: mail.clone(),
                git: git.clone(),
            },
            clock.clone(),
            EngineConfig {
                restart: RestartTimings::immediate(),
                ..EngineConfig::default()
            },
            cancel.clone(),
        );
        Self {
            engine,
            sessions,
            issues,
            mail,
            git,
            clock,
            cancel,
            workspace,
            _dir: dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.workspace.root
    }

    /// Create the agent's directory so it shows up in the roster
    pub fn add_agent(&self, id: &AgentIdentity) {
        let dir = self.workspace.naming().work_dir(id);
        std::fs::create_dir_all(dir).unwrap();
    }

    /// Store a record for `id` with `work` assigned, updated `ago_ms` before now
    pub fn set_record(&self, id: &AgentIdentity, work: Option<&str>, ago_ms: u64) {
        let record_id = self.workspace.naming().record_id(id);
        let updated = self.clock_ms() - ago_ms;
        self.issues
            .insert(test_support::agent_issue(&record_id, work, updated));
    }

    pub fn session_name(&self, id: &AgentIdentity) -> String {
        self.workspace.naming().session_name(id)
    }

    pub fn clock_ms(&self) -> u64 {
        use warden_core::Clock;
        self.clock.epoch_ms()
    }
}
