// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent identity: the single key every other handle is derived from.
//!
//! The canonical in-memory form is [`AgentIdentity`], a tagged variant with
//! the role as the tag. The mailbox address form is parsed once at each
//! boundary:
//!
//! ```text
//! overseer
//! coordinator
//! <group>/observer
//! <group>/merger
//! <group>/crew/<name>
//! <group>/workers/<name>      (`raiders` is accepted as a synonym)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from identity parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("unknown identity: {0:?}")]
    UnknownIdentity(String),
    #[error("invalid {field} {value:?} in identity")]
    InvalidSegment { field: &'static str, value: String },
    #[error("worker name {0:?} is reserved")]
    ReservedName(String),
}

/// Agent role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Overseer,
    Coordinator,
    Observer,
    Merger,
    Crew,
    Worker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Overseer => "overseer",
            Role::Coordinator => "coordinator",
            Role::Observer => "observer",
            Role::Merger => "merger",
            Role::Crew => "crew",
            Role::Worker => "worker",
        }
    }

    /// Process-wide singletons have no group
    pub fn is_singleton(&self) -> bool {
        matches!(self, Role::Overseer | Role::Coordinator)
    }

    /// Named roles carry a per-agent name within their group
    pub fn is_named(&self) -> bool {
        matches!(self, Role::Crew | Role::Worker)
    }

    /// Roles whose work directory is a persistent git clone
    pub fn persists_clone(&self) -> bool {
        matches!(self, Role::Merger | Role::Crew | Role::Worker)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one supervised agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentIdentity {
    Overseer,
    Coordinator,
    Observer { group: String },
    Merger { group: String },
    Crew { group: String, name: String },
    Worker { group: String, name: String },
}

/// Address token for the workers directory
const WORKERS_TOKEN: &str = "workers";
const RAIDERS_TOKEN: &str = "raiders";
const CREW_TOKEN: &str = "crew";

/// Worker names that would collide with another role's session name
const RESERVED_WORKER_NAMES: &[&str] = &["observer", "merger", "overseer", "coordinator"];

impl AgentIdentity {
    pub fn observer(group: impl Into<String>) -> Self {
        Self::Observer {
            group: group.into(),
        }
    }

    pub fn merger(group: impl Into<String>) -> Self {
        Self::Merger {
            group: group.into(),
        }
    }

    pub fn crew(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Crew {
            group: group.into(),
            name: name.into(),
        }
    }

    pub fn worker(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Worker {
            group: group.into(),
            name: name.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            AgentIdentity::Overseer => Role::Overseer,
            AgentIdentity::Coordinator => Role::Coordinator,
            AgentIdentity::Observer { .. } => Role::Observer,
            AgentIdentity::Merger { .. } => Role::Merger,
            AgentIdentity::Crew { .. } => Role::Crew,
            AgentIdentity::Worker { .. } => Role::Worker,
        }
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            AgentIdentity::Overseer | AgentIdentity::Coordinator => None,
            AgentIdentity::Observer { group }
            | AgentIdentity::Merger { group }
            | AgentIdentity::Crew { group, .. }
            | AgentIdentity::Worker { group, .. } => Some(group),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            AgentIdentity::Crew { name, .. } | AgentIdentity::Worker { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Mailbox address form
    pub fn address(&self) -> String {
        match self {
            AgentIdentity::Overseer => "overseer".to_string(),
            AgentIdentity::Coordinator => "coordinator".to_string(),
            AgentIdentity::Observer { group } => format!("{group}/observer"),
            AgentIdentity::Merger { group } => format!("{group}/merger"),
            AgentIdentity::Crew { group, name } => format!("{group}/{CREW_TOKEN}/{name}"),
            AgentIdentity::Worker { group, name } => format!("{group}/{WORKERS_TOKEN}/{name}"),
        }
    }

    /// Name used for commit authorship inside the agent's clone
    pub fn author_name(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => self.address(),
        }
    }

    /// The observer responsible for this agent's group, if any
    pub fn group_observer(&self) -> Option<AgentIdentity> {
        self.group().map(AgentIdentity::observer)
    }

    /// Parse a mailbox address. Unknown forms are rejected, never guessed.
    pub fn parse(address: &str) -> Result<Self, IdentityError> {
        let unknown = || IdentityError::UnknownIdentity(address.to_string());
        let trimmed = address.trim();
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let parts: Vec<&str> = trimmed.split('/').collect();

        match parts.as_slice() {
            ["overseer"] => Ok(AgentIdentity::Overseer),
            ["coordinator"] => Ok(AgentIdentity::Coordinator),
            [group, "observer"] => Ok(AgentIdentity::observer(segment("group", group)?)),
            [group, "merger"] => Ok(AgentIdentity::merger(segment("group", group)?)),
            [group, CREW_TOKEN, name] => Ok(AgentIdentity::crew(
                segment("group", group)?,
                segment("name", name)?,
            )),
            [group, WORKERS_TOKEN | RAIDERS_TOKEN, name] => {
                let name = segment("name", name)?;
                if RESERVED_WORKER_NAMES.contains(&name) || name.starts_with("crew-") {
                    return Err(IdentityError::ReservedName(name.to_string()));
                }
                Ok(AgentIdentity::worker(segment("group", group)?, name))
            }
            _ => Err(unknown()),
        }
    }
}

/// Validate a single address segment
fn segment<'a>(field: &'static str, value: &'a str) -> Result<&'a str, IdentityError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(value)
    } else {
        Err(IdentityError::InvalidSegment {
            field,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

impl FromStr for AgentIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
