// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prefix resolution: every handle derived from an [`AgentIdentity`].
//!
//! One [`Naming`] value is built from workspace and group configuration and
//! answers both directions. Session names are `<prefix>-<suffix>` where the
//! prefix is the workspace prefix for singletons and the group's session
//! prefix otherwise:
//!
//! | identity              | session                 | record id             |
//! |-----------------------|-------------------------|-----------------------|
//! | overseer              | `hq-overseer`           | `hq-overseer`         |
//! | coordinator           | `hq-coordinator`        | `hq-coordinator`      |
//! | grp/observer          | `grp-observer`          | `wd-grp-observer`     |
//! | grp/merger            | `grp-merger`            | `wd-grp-merger`       |
//! | grp/crew/max          | `grp-crew-max`          | `wd-grp-crew-max`     |
//! | grp/workers/n1        | `grp-n1`                | `wd-grp-worker-n1`    |

use crate::identity::{AgentIdentity, IdentityError, Role};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupPrefixes {
    session: String,
    issue: String,
}

/// Derives session names, work directories and record ids from identities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    root: PathBuf,
    session_prefix: String,
    issue_prefix: String,
    groups: BTreeMap<String, GroupPrefixes>,
}

impl Naming {
    pub fn new(root: impl AsRef<Path>, session_prefix: &str, issue_prefix: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            session_prefix: session_prefix.to_string(),
            issue_prefix: issue_prefix.to_string(),
            groups: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, group: &str, session_prefix: &str, issue_prefix: &str) -> Self {
        self.groups.insert(
            group.to_string(),
            GroupPrefixes {
                session: session_prefix.to_string(),
                issue: issue_prefix.to_string(),
            },
        );
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Session prefix for a group; unconfigured groups use their own name
    pub fn group_session_prefix<'a>(&'a self, group: &'a str) -> &'a str {
        self.groups
            .get(group)
            .map(|p| p.session.as_str())
            .unwrap_or(group)
    }

    fn group_issue_prefix(&self, group: &str) -> &str {
        self.groups
            .get(group)
            .map(|p| p.issue.as_str())
            .unwrap_or("wd")
    }

    /// Multiplexer session name
    pub fn session_name(&self, id: &AgentIdentity) -> String {
        match id {
            AgentIdentity::Overseer => format!("{}-overseer", self.session_prefix),
            AgentIdentity::Coordinator => format!("{}-coordinator", self.session_prefix),
            AgentIdentity::Observer { group } => {
                format!("{}-observer", self.group_session_prefix(group))
            }
            AgentIdentity::Merger { group } => {
                format!("{}-merger", self.group_session_prefix(group))
            }
            AgentIdentity::Crew { group, name } => {
                format!("{}-crew-{name}", self.group_session_prefix(group))
            }
            AgentIdentity::Worker { group, name } => {
                format!("{}-{name}", self.group_session_prefix(group))
            }
        }
    }

    /// Directory the agent's session starts in
    pub fn work_dir(&self, id: &AgentIdentity) -> PathBuf {
        match id {
            AgentIdentity::Overseer => self.root.join("overseer"),
            AgentIdentity::Coordinator => self.root.join("coordinator"),
            AgentIdentity::Observer { group } => self.root.join(group).join("observer"),
            AgentIdentity::Merger { group } => self.root.join(group).join("merger"),
            AgentIdentity::Crew { group, name } => self.root.join(group).join("crew").join(name),
            AgentIdentity::Worker { group, name } => {
                self.root.join(group).join("raiders").join(name)
            }
        }
    }

    /// Id of the agent's record in the issue store
    pub fn record_id(&self, id: &AgentIdentity) -> String {
        let role = id.role();
        match (id.group(), id.name()) {
            (None, _) => format!("{}-{role}", self.issue_prefix),
            (Some(group), None) => format!("{}-{group}-{role}", self.group_issue_prefix(group)),
            (Some(group), Some(name)) => {
                format!("{}-{group}-{role}-{name}", self.group_issue_prefix(group))
            }
        }
    }

    /// Reverse lookup from a session name.
    ///
    /// The longest matching prefix wins so a group named `a` never captures
    /// sessions of a group whose prefix is `a-b`.
    pub fn identity_for_session(&self, session: &str) -> Result<AgentIdentity, IdentityError> {
        let unknown = || IdentityError::UnknownIdentity(session.to_string());

        if let Some(rest) = strip_prefix(session, &self.session_prefix) {
            match rest {
                "overseer" => return Ok(AgentIdentity::Overseer),
                "coordinator" => return Ok(AgentIdentity::Coordinator),
                _ => {}
            }
        }

        let (group, rest) = self
            .groups
            .iter()
            .filter_map(|(group, p)| Some((group, strip_prefix(session, &p.session)?, p)))
            .max_by_key(|(_, _, p)| p.session.len())
            .map(|(group, rest, _)| (group.as_str(), rest))
            .ok_or_else(unknown)?;

        let id = match rest {
            "observer" => AgentIdentity::observer(group),
            "merger" => AgentIdentity::merger(group),
            _ => match rest.strip_prefix("crew-") {
                Some(name) if !name.is_empty() => AgentIdentity::crew(group, name),
                Some(_) => return Err(unknown()),
                None => AgentIdentity::worker(group, rest),
            },
        };
        // Round-trip through the address form to validate segments
        AgentIdentity::parse(&id.address())
    }

    /// Whether `role` sessions run without ancillary background helpers
    pub fn suppresses_background_daemon(role: Role) -> bool {
        matches!(role, Role::Worker | Role::Merger)
    }
}

/// `session` minus `<prefix>-`, if it has that form with a non-empty rest
fn strip_prefix<'a>(session: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = session.strip_prefix(prefix)?.strip_prefix('-')?;
    (!rest.is_empty()).then_some(rest)
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
