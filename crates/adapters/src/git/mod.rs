// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git adapters

mod cli;

pub use cli::CliGitAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeGitAdapter, GitCall};

use crate::error::AdapterError;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait GitAdapter: Clone + Send + Sync + 'static {
    async fn fetch(&self, dir: &Path, remote: &str) -> Result<(), AdapterError>;

    async fn pull_rebase(&self, dir: &Path, remote: &str, branch: &str)
        -> Result<(), AdapterError>;

    /// Resolve a ref to a commit id
    async fn rev(&self, dir: &Path, reference: &str) -> Result<String, AdapterError>;

    /// Whether `commit` is reachable from `reference`
    async fn is_ancestor(
        &self,
        dir: &Path,
        commit: &str,
        reference: &str,
    ) -> Result<bool, AdapterError>;

    async fn remotes(&self, dir: &Path) -> Result<Vec<String>, AdapterError>;
}
