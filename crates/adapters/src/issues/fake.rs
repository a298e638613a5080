// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake issue store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EventStream, IssueStore};
use crate::error::AdapterError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use warden_core::Issue;

/// Recorded issue-store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueCall {
    Show(String),
    ListByType(String),
    FollowEvents,
    FindTrackers(String),
    CheckCompletion(String),
}

struct FakeIssueState {
    issues: BTreeMap<String, Issue>,
    trackers: BTreeMap<String, Vec<String>>,
    /// One entry per `follow_events` call; the stream ends after its lines
    event_batches: VecDeque<Vec<String>>,
    /// Senders of open-ended streams, kept so those streams never end
    idle_senders: Vec<mpsc::Sender<String>>,
    unreadable: HashSet<String>,
    fail_follow: bool,
    fail_completion: bool,
    calls: Vec<IssueCall>,
}

#[derive(Clone)]
pub struct FakeIssueStore {
    inner: Arc<Mutex<FakeIssueState>>,
}

impl Default for FakeIssueStore {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeIssueState {
                issues: BTreeMap::new(),
                trackers: BTreeMap::new(),
                event_batches: VecDeque::new(),
                idle_senders: Vec::new(),
                unreadable: HashSet::new(),
                fail_follow: false,
                fail_completion: false,
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<IssueCall> {
        self.inner.lock().calls.clone()
    }

    /// Aggregate ids passed to `check_completion`, in call order
    pub fn completion_checks(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                IssueCall::CheckCompletion(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn insert(&self, issue: Issue) {
        self.inner.lock().issues.insert(issue.id.clone(), issue);
    }

    pub fn remove(&self, id: &str) {
        self.inner.lock().issues.remove(id);
    }

    pub fn set_trackers(&self, child_id: &str, aggregates: &[&str]) {
        self.inner.lock().trackers.insert(
            child_id.to_string(),
            aggregates.iter().map(|s| s.to_string()).collect(),
        );
    }

    /// Queue the lines the next `follow_events` stream yields before ending
    pub fn push_event_batch(&self, lines: &[&str]) {
        self.inner
            .lock()
            .event_batches
            .push_back(lines.iter().map(|s| s.to_string()).collect());
    }

    /// Make `show` fail for this id
    pub fn set_unreadable(&self, id: &str) {
        self.inner.lock().unreadable.insert(id.to_string());
    }

    pub fn set_fail_follow(&self, fail: bool) {
        self.inner.lock().fail_follow = fail;
    }

    pub fn set_fail_completion(&self, fail: bool) {
        self.inner.lock().fail_completion = fail;
    }

    fn injected(command: &str) -> AdapterError {
        AdapterError::ExternalError {
            command: command.to_string(),
            stderr: "injected failure".to_string(),
            exit: Some(1),
        }
    }
}

#[async_trait]
impl IssueStore for FakeIssueStore {
    async fn show(&self, id: &str) -> Result<Option<Issue>, AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IssueCall::Show(id.to_string()));
        if inner.unreadable.contains(id) {
            return Err(Self::injected("bd show"));
        }
        Ok(inner.issues.get(id).cloned())
    }

    async fn list_by_type(&self, issue_type: &str) -> Result<Vec<Issue>, AdapterError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(IssueCall::ListByType(issue_type.to_string()));
        Ok(inner
            .issues
            .values()
            .filter(|i| i.issue_type == issue_type)
            .cloned()
            .collect())
    }

    async fn follow_events(&self) -> Result<EventStream, AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IssueCall::FollowEvents);
        if inner.fail_follow {
            return Err(Self::injected("bd activity"));
        }
        let batch = inner.event_batches.pop_front();
        let capacity = batch.as_ref().map_or(1, |b| b.len().max(1));
        let (tx, rx) = mpsc::channel(capacity);
        match batch {
            Some(lines) => {
                for line in lines {
                    // Capacity covers the batch, so this never fails
                    let _ = tx.try_send(line);
                }
            }
            None => inner.idle_senders.push(tx),
        }
        Ok(EventStream::from_channel(rx))
    }

    async fn find_trackers(&self, child_id: &str) -> Result<Vec<String>, AdapterError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(IssueCall::FindTrackers(child_id.to_string()));
        Ok(inner.trackers.get(child_id).cloned().unwrap_or_default())
    }

    async fn check_completion(&self, aggregate_id: &str) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(IssueCall::CheckCompletion(aggregate_id.to_string()));
        if inner.fail_completion {
            return Err(Self::injected("completion check"));
        }
        Ok(())
    }
}
