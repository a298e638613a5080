// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue-store adapters

mod bd;
mod stream;

pub use bd::BdIssueStore;
pub use stream::EventStream;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeIssueStore, IssueCall};

use crate::error::AdapterError;
use async_trait::async_trait;
use warden_core::Issue;

/// Adapter over the issue-store CLI.
///
/// Responses are JSON; entries that fail to decode are skipped because
/// store versions vary. A missing record is `Ok(None)`, not an error.
#[async_trait]
pub trait IssueStore: Clone + Send + Sync + 'static {
    async fn show(&self, id: &str) -> Result<Option<Issue>, AdapterError>;

    async fn list_by_type(&self, issue_type: &str) -> Result<Vec<Issue>, AdapterError>;

    /// Start following the activity stream
    async fn follow_events(&self) -> Result<EventStream, AdapterError>;

    /// Ids of aggregates with a `tracks` link to `child_id`
    async fn find_trackers(&self, child_id: &str) -> Result<Vec<String>, AdapterError>;

    /// Run the external aggregate-completion command for `aggregate_id`
    async fn check_completion(&self, aggregate_id: &str) -> Result<(), AdapterError>;
}
