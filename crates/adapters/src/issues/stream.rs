// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line stream from a following child process

use crate::error::AdapterError;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout};
use tokio::sync::mpsc;

enum Source {
    Child {
        child: Child,
        lines: Lines<BufReader<ChildStdout>>,
    },
    Channel(mpsc::Receiver<String>),
}

/// Newline-delimited event lines, in the order the producer wrote them.
///
/// `next_line` returning `Ok(None)` means the producer exited.
pub struct EventStream {
    source: Source,
    description: String,
}

impl EventStream {
    /// Stream a spawned child's stdout. The child is killed when the stream drops.
    pub fn from_child(mut child: Child, description: &str) -> Result<Self, AdapterError> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AdapterError::ExternalError {
                command: description.to_string(),
                stderr: "stdout not captured".to_string(),
                exit: None,
            })?;
        Ok(Self {
            source: Source::Child {
                child,
                lines: BufReader::new(stdout).lines(),
            },
            description: description.to_string(),
        })
    }

    /// Stream lines from a channel; ends when every sender is dropped
    pub fn from_channel(rx: mpsc::Receiver<String>) -> Self {
        Self {
            source: Source::Channel(rx),
            description: "channel".to_string(),
        }
    }

    pub async fn next_line(&mut self) -> Result<Option<String>, AdapterError> {
        match &mut self.source {
            Source::Child { lines, .. } => {
                lines
                    .next_line()
                    .await
                    .map_err(|e| AdapterError::ExternalError {
                        command: self.description.clone(),
                        stderr: e.to_string(),
                        exit: None,
                    })
            }
            Source::Channel(rx) => Ok(rx.recv().await),
        }
    }

    /// Stop the producer and reap it
    pub async fn terminate(self) {
        if let Source::Child { mut child, .. } = self.source {
            if let Err(e) = child.kill().await {
                tracing::debug!(command = %self.description, error = %e, "event stream already exited");
            }
        }
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
