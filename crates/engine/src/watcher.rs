// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity watcher.
//!
//! Follows the issue store's event stream and, for each close event, fires
//! the aggregate-completion check on every still-open tracker of the closed
//! issue. Events are handled in stream order; duplicates are harmless since
//! the completion check is idempotent.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use warden_adapters::{EventStream, IssueStore};
use warden_core::ActivityEvent;

/// Back-off before re-following after the stream ends or fails
pub const WATCH_RETRY: Duration = Duration::from_secs(5);

pub struct ActivityWatcher<I> {
    issues: I,
    retry: Duration,
    cancel: CancellationToken,
}

impl<I: IssueStore> ActivityWatcher<I> {
    pub fn new(issues: I, cancel: CancellationToken) -> Self {
        Self {
            issues,
            retry: WATCH_RETRY,
            cancel,
        }
    }

    pub fn with_retry(mut self, retry: Duration) -> Self {
        self.retry = retry;
        self
    }

    /// Follow events until cancelled, restarting the follow after failures
    pub async fn run(self) {
        tracing::info!("activity watcher started");
        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            match self.issues.follow_events().await {
                Ok(stream) => {
                    if self.drain(stream).await {
                        break;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to follow activity events"),
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.retry) => {}
            }
            tracing::debug!("re-following activity events");
        }
        tracing::info!("activity watcher stopped");
    }

    /// Handle lines until the stream ends; returns true if cancelled
    async fn drain(&self, mut stream: EventStream) -> bool {
        loop {
            let next = tokio::select! {
                _ = self.cancel.cancelled() => None,
                line = stream.next_line() => Some(line),
            };
            match next {
                None => {
                    stream.terminate().await;
                    return true;
                }
                Some(Ok(Some(line))) => {
                    self.handle_line(&line).await;
                }
                Some(Ok(None)) => {
                    tracing::info!("activity stream ended");
                    stream.terminate().await;
                    return false;
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "activity stream failed");
                    stream.terminate().await;
                    return false;
                }
            }
        }
    }

    /// Handle one stream line; returns the number of completion checks fired
    pub async fn handle_line(&self, line: &str) -> usize {
        let event = match ActivityEvent::parse_line(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed activity event");
                return 0;
            }
        };
        if !event.is_close() {
            return 0;
        }

        let trackers = match self.issues.find_trackers(&event.issue_id).await {
            Ok(trackers) => trackers,
            Err(e) => {
                tracing::warn!(issue = %event.issue_id, error = %e, "tracker lookup failed");
                return 0;
            }
        };

        let mut fired = 0;
        for aggregate in trackers {
            match self.issues.show(&aggregate).await {
                Ok(Some(issue)) if issue.is_open() => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(%aggregate, error = %e, "cannot read tracker");
                    continue;
                }
            }
            match self.issues.check_completion(&aggregate).await {
                Ok(()) => {
                    tracing::info!(%aggregate, closed = %event.issue_id, "completion check ran");
                    fired += 1;
                }
                Err(e) => tracing::warn!(%aggregate, error = %e, "completion check failed"),
            }
        }
        fired
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
