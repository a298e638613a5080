// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mailbox adapters

mod cli;

pub use cli::CliMailAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMailAdapter, MailCall};

use crate::error::AdapterError;
use async_trait::async_trait;
use warden_core::{AgentIdentity, Message, OutgoingMessage};

/// Adapter over the mailbox CLI. `delete` is the claim primitive.
#[async_trait]
pub trait MailAdapter: Clone + Send + Sync + 'static {
    /// Messages in `identity`'s inbox, in the order the mailbox returns them
    async fn inbox(&self, identity: &AgentIdentity) -> Result<Vec<Message>, AdapterError>;

    async fn delete(&self, message_id: &str) -> Result<(), AdapterError>;

    async fn send(&self, message: &OutgoingMessage) -> Result<(), AdapterError>;
}
