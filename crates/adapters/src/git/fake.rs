// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake git adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::GitAdapter;
use crate::error::AdapterError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Fetch { dir: PathBuf, remote: String },
    PullRebase { dir: PathBuf, remote: String, branch: String },
    Rev { dir: PathBuf, reference: String },
    IsAncestor { dir: PathBuf, commit: String, reference: String },
    Remotes { dir: PathBuf },
}

#[derive(Default)]
struct FakeGitState {
    remotes: BTreeMap<PathBuf, Vec<String>>,
    fail_fetch: HashSet<PathBuf>,
    fail_pull: HashSet<PathBuf>,
    behind: HashSet<PathBuf>,
    calls: Vec<GitCall>,
}

/// Every directory has remote `origin` and is up to date unless configured otherwise
#[derive(Clone, Default)]
pub struct FakeGitAdapter {
    inner: Arc<Mutex<FakeGitState>>,
}

impl FakeGitAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.inner.lock().calls.clone()
    }

    pub fn set_remotes(&self, dir: &Path, remotes: &[&str]) {
        self.inner.lock().remotes.insert(
            dir.to_path_buf(),
            remotes.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn fail_fetch(&self, dir: &Path) {
        self.inner.lock().fail_fetch.insert(dir.to_path_buf());
    }

    pub fn fail_pull(&self, dir: &Path) {
        self.inner.lock().fail_pull.insert(dir.to_path_buf());
    }

    /// HEAD in `dir` is not an ancestor of anything
    pub fn set_behind(&self, dir: &Path) {
        self.inner.lock().behind.insert(dir.to_path_buf());
    }

    fn injected(command: &str) -> AdapterError {
        AdapterError::ExternalError {
            command: command.to_string(),
            stderr: "injected failure".to_string(),
            exit: Some(128),
        }
    }
}

#[async_trait]
impl GitAdapter for FakeGitAdapter {
    async fn fetch(&self, dir: &Path, remote: &str) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::Fetch {
            dir: dir.to_path_buf(),
            remote: remote.to_string(),
        });
        if inner.fail_fetch.contains(dir) {
            return Err(Self::injected("git fetch"));
        }
        Ok(())
    }

    async fn pull_rebase(
        &self,
        dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::PullRebase {
            dir: dir.to_path_buf(),
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        if inner.fail_pull.contains(dir) {
            return Err(Self::injected("git pull --rebase"));
        }
        Ok(())
    }

    async fn rev(&self, dir: &Path, reference: &str) -> Result<String, AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::Rev {
            dir: dir.to_path_buf(),
            reference: reference.to_string(),
        });
        Ok(format!("rev-of-{reference}"))
    }

    async fn is_ancestor(
        &self,
        dir: &Path,
        commit: &str,
        reference: &str,
    ) -> Result<bool, AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::IsAncestor {
            dir: dir.to_path_buf(),
            commit: commit.to_string(),
            reference: reference.to_string(),
        });
        Ok(!inner.behind.contains(dir))
    }

    async fn remotes(&self, dir: &Path) -> Result<Vec<String>, AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::Remotes {
            dir: dir.to_path_buf(),
        });
        Ok(inner
            .remotes
            .get(dir)
            .cloned()
            .unwrap_or_else(|| vec!["origin".to_string()]))
    }
}
