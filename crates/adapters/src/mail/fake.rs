// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake mailbox for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::MailAdapter;
use crate::error::AdapterError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use warden_core::{AgentIdentity, Message, OutgoingMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailCall {
    Inbox(String),
    Delete(String),
    Send(OutgoingMessage),
}

#[derive(Default)]
struct FakeMailState {
    inboxes: BTreeMap<String, Vec<Message>>,
    fail_delete: HashSet<String>,
    fail_inbox: bool,
    calls: Vec<MailCall>,
}

#[derive(Clone, Default)]
pub struct FakeMailAdapter {
    inner: Arc<Mutex<FakeMailState>>,
}

impl FakeMailAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a message in the inbox of address `to`
    pub fn deliver(&self, to: &str, message: Message) {
        self.inner
            .lock()
            .inboxes
            .entry(to.to_string())
            .or_default()
            .push(message);
    }

    pub fn inbox_of(&self, address: &str) -> Vec<Message> {
        self.inner
            .lock()
            .inboxes
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<MailCall> {
        self.inner.lock().calls.clone()
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MailCall::Send(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MailCall::Delete(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fail_delete(&self, message_id: &str) {
        self.inner
            .lock()
            .fail_delete
            .insert(message_id.to_string());
    }

    pub fn set_fail_inbox(&self, fail: bool) {
        self.inner.lock().fail_inbox = fail;
    }
}

#[async_trait]
impl MailAdapter for FakeMailAdapter {
    async fn inbox(&self, identity: &AgentIdentity) -> Result<Vec<Message>, AdapterError> {
        let address = identity.address();
        let mut inner = self.inner.lock();
        inner.calls.push(MailCall::Inbox(address.clone()));
        if inner.fail_inbox {
            return Err(AdapterError::ExternalError {
                command: "mail inbox".to_string(),
                stderr: "injected failure".to_string(),
                exit: Some(1),
            });
        }
        Ok(inner.inboxes.get(&address).cloned().unwrap_or_default())
    }

    async fn delete(&self, message_id: &str) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MailCall::Delete(message_id.to_string()));
        if inner.fail_delete.contains(message_id) {
            return Err(AdapterError::ExternalError {
                command: "mail delete".to_string(),
                stderr: "injected failure".to_string(),
                exit: Some(1),
            });
        }
        let mut found = false;
        for inbox in inner.inboxes.values_mut() {
            let before = inbox.len();
            inbox.retain(|m| m.id != message_id);
            found |= inbox.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(AdapterError::NotFound(message_id.to_string()))
        }
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MailCall::Send(message.clone()));
        Ok(())
    }
}
