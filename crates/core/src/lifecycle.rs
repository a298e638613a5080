// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle requests carried in mailbox messages.
//!
//! A request has a subject starting with `LIFECYCLE:` (any case) and names
//! its action in the body, preferably as JSON `{"action": "restart"}` or an
//! `action: restart` line, with a body of just the action word accepted as a fallback.

use crate::message::Message;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const LIFECYCLE_PREFIX: &str = "LIFECYCLE:";

/// Requests older than this are discarded without execution
pub const LIFECYCLE_MAX_AGE: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleParseError {
    #[error("no lifecycle action in message body")]
    MissingAction,
    #[error("unknown lifecycle action {0:?}")]
    UnknownAction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    Restart,
    Shutdown,
    Cycle,
}

impl LifecycleAction {
    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "restart" => Some(Self::Restart),
            "shutdown" | "stop" => Some(Self::Shutdown),
            "cycle" => Some(Self::Cycle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::Shutdown => "shutdown",
            Self::Cycle => "cycle",
        }
    }

    /// Parse an action from a message body
    pub fn parse_body(body: &str) -> Result<Self, LifecycleParseError> {
        #[derive(Deserialize)]
        struct Structured {
            action: String,
        }

        let trimmed = body.trim();
        if let Ok(structured) = serde_json::from_str::<Structured>(trimmed) {
            return Self::from_word(structured.action.trim())
                .ok_or(LifecycleParseError::UnknownAction(structured.action));
        }

        for line in trimmed.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("action") {
                let value = value.trim();
                return Self::from_word(value)
                    .ok_or_else(|| LifecycleParseError::UnknownAction(value.to_string()));
            }
        }

        // Bare word: the whole body, nothing else
        Self::from_word(trimmed.trim_end_matches(['.', '!']))
            .ok_or(LifecycleParseError::MissingAction)
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed request, not yet claimed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleRequest {
    pub message_id: String,
    /// Sender address as given; resolved to an identity only after the claim
    pub sender: String,
    pub action: LifecycleAction,
    pub received_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// What to do with one inbox message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Triage {
    /// Not a lifecycle message, or already read
    Ignore,
    /// Older than [`LIFECYCLE_MAX_AGE`]: delete, do not execute
    Stale { message_id: String },
    /// Lifecycle subject but no usable action: delete, do not execute
    Malformed {
        message_id: String,
        error: LifecycleParseError,
    },
    /// Claim, then execute
    Execute(LifecycleRequest),
}

impl Triage {
    /// Classify `message` at wall-clock `now_ms`.
    ///
    /// Messages without a timestamp, or stamped in the future, count as fresh.
    pub fn classify(message: &Message, now_ms: u64) -> Self {
        if message.read || !is_lifecycle_subject(&message.subject) {
            return Triage::Ignore;
        }
        if let Some(age) = message.age_ms(now_ms) {
            if u128::from(age) > LIFECYCLE_MAX_AGE.as_millis() {
                return Triage::Stale {
                    message_id: message.id.clone(),
                };
            }
        }
        match LifecycleAction::parse_body(&message.body) {
            Ok(action) => Triage::Execute(LifecycleRequest {
                message_id: message.id.clone(),
                sender: message.from.clone(),
                action,
                received_at: message.timestamp,
            }),
            Err(error) => Triage::Malformed {
                message_id: message.id.clone(),
                error,
            },
        }
    }
}

/// Subject gate: starts with `LIFECYCLE:`, case-insensitive
pub fn is_lifecycle_subject(subject: &str) -> bool {
    let subject = subject.trim_start();
    subject
        .get(..LIFECYCLE_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(LIFECYCLE_PREFIX))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
