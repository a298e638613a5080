// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue store backed by the `bd` CLI

use super::{EventStream, IssueStore};
use crate::error::AdapterError;
use crate::subprocess::{
    check_status, run_cancellable, stderr_of, COMPLETION_TIMEOUT, ISSUES_TIMEOUT,
};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use warden_core::Issue;

#[derive(Clone)]
pub struct BdIssueStore {
    bin: String,
    cwd: PathBuf,
    completion_command: Vec<String>,
    cancel: CancellationToken,
}

impl BdIssueStore {
    /// Store rooted at `cwd`; `completion_command` gets the aggregate id appended
    pub fn new(cwd: impl AsRef<Path>, completion_command: Vec<String>) -> Self {
        Self {
            bin: crate::env::issues_bin(),
            cwd: cwd.as_ref().to_path_buf(),
            completion_command,
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

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args).current_dir(&self.cwd);
        cmd
    }

    async fn json(&self, args: &[&str], description: &str) -> Result<Value, AdapterError> {
        let output =
            run_cancellable(self.command(args), ISSUES_TIMEOUT, description, &self.cancel).await?;
        let output = check_status(output, description)?;
        serde_json::from_slice(&output.stdout).map_err(|e| AdapterError::ExternalError {
            command: description.to_string(),
            stderr: format!("unparseable output: {e}"),
            exit: output.status.code(),
        })
    }
}

/// Decode each array element as an issue, skipping the ones that don't fit
fn decode_issues(value: Value, description: &str) -> Vec<Issue> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Issue>(item) {
            Ok(issue) => Some(issue),
            Err(e) => {
                tracing::debug!(command = description, error = %e, "skipping malformed issue");
                None
            }
        })
        .collect()
}

fn is_not_found(err: &AdapterError) -> bool {
    match err {
        AdapterError::ExternalError { stderr, .. } => {
            let stderr = stderr.to_ascii_lowercase();
            stderr.contains("not found") || stderr.contains("no issue")
        }
        _ => false,
    }
}

#[async_trait]
impl IssueStore for BdIssueStore {
    async fn show(&self, id: &str) -> Result<Option<Issue>, AdapterError> {
        match self.json(&["show", id, "--json"], "bd show").await {
            Ok(value) => Ok(decode_issues(value, "bd show")
                .into_iter()
                .find(|issue| issue.id == id)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_by_type(&self, issue_type: &str) -> Result<Vec<Issue>, AdapterError> {
        let type_arg = format!("--type={issue_type}");
        let value = self
            .json(&["list", &type_arg, "--json"], "bd list")
            .await?;
        Ok(decode_issues(value, "bd list"))
    }

    async fn follow_events(&self) -> Result<EventStream, AdapterError> {
        let description = "bd activity --follow";
        let mut cmd = self.command(&["activity", "--follow", "--json"]);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        let child = cmd
            .spawn()
            .map_err(|e| AdapterError::from_spawn(description, &e))?;
        EventStream::from_child(child, description)
    }

    async fn find_trackers(&self, child_id: &str) -> Result<Vec<String>, AdapterError> {
        let value = match self
            .json(
                &["dep", "list", child_id, "--direction=up", "--type=tracks", "--json"],
                "bd dep list",
            )
            .await
        {
            Ok(value) => value,
            Err(e) if is_not_found(&e) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(decode_issues(value, "bd dep list")
            .into_iter()
            .map(|issue| issue.id)
            .collect())
    }

    async fn check_completion(&self, aggregate_id: &str) -> Result<(), AdapterError> {
        let Some((program, args)) = self.completion_command.split_first() else {
            return Err(AdapterError::NotFound(
                "completion command not configured".to_string(),
            ));
        };
        let description = format!("{program} {}", args.join(" "));
        let mut cmd = Command::new(program);
        cmd.args(args).arg(aggregate_id).current_dir(&self.cwd);
        let output = run_cancellable(cmd, COMPLETION_TIMEOUT, &description, &self.cancel).await?;
        if !output.status.success() {
            return Err(AdapterError::ExternalError {
                command: description,
                stderr: stderr_of(&output),
                exit: output.status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "bd_tests.rs"]
mod tests;
