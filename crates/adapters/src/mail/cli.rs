// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mailbox backed by the `warden mail` CLI

use super::MailAdapter;
use crate::error::AdapterError;
use crate::subprocess::{check_status, run_cancellable, MAIL_TIMEOUT};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use warden_core::{AgentIdentity, Message, OutgoingMessage};

#[derive(Clone)]
pub struct CliMailAdapter {
    bin: String,
    cwd: PathBuf,
    cancel: CancellationToken,
}

impl CliMailAdapter {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            bin: crate::env::mail_bin(),
            cwd: cwd.as_ref().to_path_buf(),
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

    async fn run(&self, args: &[&str], description: &str) -> Result<Vec<u8>, AdapterError> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("mail").args(args).current_dir(&self.cwd);
        let output = run_cancellable(cmd, MAIL_TIMEOUT, description, &self.cancel).await?;
        Ok(check_status(output, description)?.stdout)
    }
}

/// Decode inbox entries, skipping any that don't fit
fn decode_messages(stdout: &[u8]) -> Result<Vec<Message>, AdapterError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_slice(stdout).map_err(|e| AdapterError::ExternalError {
        command: "mail inbox".to_string(),
        stderr: format!("unparseable output: {e}"),
        exit: Some(0),
    })?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Message>(item) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed message");
                None
            }
        })
        .collect())
}

#[async_trait]
impl MailAdapter for CliMailAdapter {
    async fn inbox(&self, identity: &AgentIdentity) -> Result<Vec<Message>, AdapterError> {
        let address = identity.address();
        let stdout = self
            .run(
                &["inbox", "--identity", &address, "--json"],
                "mail inbox",
            )
            .await?;
        decode_messages(&stdout)
    }

    async fn delete(&self, message_id: &str) -> Result<(), AdapterError> {
        self.run(&["delete", message_id], "mail delete")
            .await
            .map(|_| ())
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<(), AdapterError> {
        self.run(
            &[
                "send",
                &message.to,
                "--subject",
                &message.subject,
                "--message",
                &message.body,
                "--priority",
                message.priority.as_str(),
            ],
            "mail send",
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
