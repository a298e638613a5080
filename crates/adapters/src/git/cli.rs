// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git adapter backed by the `git` binary

use super::GitAdapter;
use crate::error::AdapterError;
use crate::subprocess::{
    check_status, run_cancellable, stderr_of, stdout_of, GIT_REMOTE_TIMEOUT, GIT_TIMEOUT,
};
use async_trait::async_trait;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct CliGitAdapter {
    bin: String,
    cancel: CancellationToken,
}

impl Default for CliGitAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CliGitAdapter {
    pub fn new() -> Self {
        Self {
            bin: crate::env::git_bin(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_binary(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    async fn raw(
        &self,
        dir: &Path,
        args: &[&str],
        timeout: Duration,
        description: &str,
    ) -> Result<Output, AdapterError> {
        if !dir.is_dir() {
            return Err(AdapterError::NotFound(dir.display().to_string()));
        }
        let mut cmd = Command::new(&self.bin);
        cmd.arg("-C")
            .arg(dir)
            .args(args)
            // Never block on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0");
        run_cancellable(cmd, timeout, description, &self.cancel).await
    }

    async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        timeout: Duration,
        description: &str,
    ) -> Result<Output, AdapterError> {
        let output = self.raw(dir, args, timeout, description).await?;
        check_status(output, description)
    }
}

#[async_trait]
impl GitAdapter for CliGitAdapter {
    async fn fetch(&self, dir: &Path, remote: &str) -> Result<(), AdapterError> {
        self.run(dir, &["fetch", remote], GIT_REMOTE_TIMEOUT, "git fetch")
            .await
            .map(|_| ())
    }

    async fn pull_rebase(
        &self,
        dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<(), AdapterError> {
        self.run(
            dir,
            &["pull", "--rebase", remote, branch],
            GIT_REMOTE_TIMEOUT,
            "git pull --rebase",
        )
        .await
        .map(|_| ())
    }

    async fn rev(&self, dir: &Path, reference: &str) -> Result<String, AdapterError> {
        let output = self
            .run(
                dir,
                &["rev-parse", "--verify", reference],
                GIT_TIMEOUT,
                "git rev-parse",
            )
            .await?;
        Ok(stdout_of(&output))
    }

    async fn is_ancestor(
        &self,
        dir: &Path,
        commit: &str,
        reference: &str,
    ) -> Result<bool, AdapterError> {
        let description = "git merge-base --is-ancestor";
        let output = self
            .raw(
                dir,
                &["merge-base", "--is-ancestor", commit, reference],
                GIT_TIMEOUT,
                description,
            )
            .await?;
        // Exit 1 means "not an ancestor"; anything else non-zero is a failure
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            exit => Err(AdapterError::ExternalError {
                command: description.to_string(),
                stderr: stderr_of(&output),
                exit,
            }),
        }
    }

    async fn remotes(&self, dir: &Path) -> Result<Vec<String>, AdapterError> {
        let output = self.run(dir, &["remote"], GIT_TIMEOUT, "git remote").await?;
        Ok(stdout_of(&output)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
