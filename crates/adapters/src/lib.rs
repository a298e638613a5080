// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external CLIs the daemon drives: multiplexer, issue
//! store, mailbox and git. One trait per tool, one method per operation.

mod env;
pub mod error;
pub mod git;
pub mod issues;
pub mod mail;
pub mod session;
pub mod subprocess;
pub mod traced;

pub use error::AdapterError;
pub use git::{CliGitAdapter, GitAdapter};
pub use issues::{BdIssueStore, EventStream, IssueStore};
pub use mail::{CliMailAdapter, MailAdapter};
pub use session::{SessionAdapter, TmuxAdapter};
pub use traced::TracedSession;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use git::{FakeGitAdapter, GitCall};
#[cfg(any(test, feature = "test-support"))]
pub use issues::{FakeIssueStore, IssueCall};
#[cfg(any(test, feature = "test-support"))]
pub use mail::{FakeMailAdapter, MailCall};
#[cfg(any(test, feature = "test-support"))]
pub use session::{FakeSession, FakeSessionAdapter, SessionCall};
