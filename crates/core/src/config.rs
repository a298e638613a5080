// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace and per-group configuration.
//!
//! The workspace root holds an optional `warden.toml`; every direct
//! subdirectory with a `group.toml` is a group. Named agents are discovered
//! from the group's `raiders/` and `crew/` directories.

use crate::identity::AgentIdentity;
use crate::naming::Naming;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const WORKSPACE_CONFIG_FILE: &str = "warden.toml";
pub const GROUP_CONFIG_FILE: &str = "group.toml";

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Workspace-level settings from `warden.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Session-name prefix for the process-wide singletons
    pub session_prefix: String,
    /// Agent-record id prefix for the process-wide singletons
    pub issue_prefix: String,
    /// Command typed into a fresh session to launch the assistant
    pub assistant_command: String,
    /// Variable the assistant exports with its own session id
    pub session_id_var: String,
    /// Address whose inbox receives lifecycle requests
    pub lifecycle_inbox: String,
    /// Whether the heartbeat keeps the overseer session running
    pub ensure_overseer: bool,
    /// Invocation that checks an aggregate for completion; the id is appended
    pub completion_command: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            session_prefix: "hq".to_string(),
            issue_prefix: "hq".to_string(),
            assistant_command: "claude --dangerously-skip-permissions".to_string(),
            session_id_var: "CLAUDE_SESSION_ID".to_string(),
            lifecycle_inbox: "coordinator".to_string(),
            ensure_overseer: true,
            completion_command: vec![
                "warden".to_string(),
                "aggregate".to_string(),
                "check".to_string(),
            ],
        }
    }
}

impl WorkspaceConfig {
    /// Load `warden.toml` from the workspace root; a missing file yields defaults
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(WORKSPACE_CONFIG_FILE);
        match read_optional(&path)? {
            Some(content) => parse_toml(&path, &content),
            None => Ok(Self::default()),
        }
    }
}

/// Operational status of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    #[default]
    Operational,
    Parked,
    Docked,
}

/// Cosmetic session styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTheme {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Per-group settings from `<group>/group.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub status: GroupStatus,
    pub auto_restart: bool,
    pub session_prefix: Option<String>,
    pub issue_prefix: Option<String>,
    pub remote: String,
    pub default_branch: String,
    pub theme: Option<SessionTheme>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            status: GroupStatus::Operational,
            auto_restart: true,
            session_prefix: None,
            issue_prefix: None,
            remote: "origin".to_string(),
            default_branch: "main".to_string(),
            theme: None,
        }
    }
}

impl GroupConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_toml(path, &content)
    }

    /// Why sessions in this group must not be (re)started, if they must not
    pub fn non_operational_reason(&self) -> Option<String> {
        match self.status {
            GroupStatus::Parked => Some("group is parked".to_string()),
            GroupStatus::Docked => Some("group is docked".to_string()),
            GroupStatus::Operational if !self.auto_restart => {
                Some("auto_restart disabled".to_string())
            }
            GroupStatus::Operational => None,
        }
    }

    /// Explicit theme, or the palette default for `group`
    pub fn theme_for(&self, group: &str) -> SessionTheme {
        self.theme.clone().unwrap_or_else(|| default_theme(group))
    }
}

const THEME_PALETTE: &[&str] = &[
    "colour33", "colour37", "colour64", "colour94", "colour130", "colour132", "colour166",
    "colour172",
];

/// Palette color chosen by a stable hash of the group name
pub fn default_theme(group: &str) -> SessionTheme {
    // FNV-1a: stable across builds, unlike the std hasher
    let hash = group.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |acc, b| {
        (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    });
    let color = THEME_PALETTE[(hash % THEME_PALETTE.len() as u64) as usize];
    SessionTheme {
        color: color.to_string(),
        title: Some(group.to_string()),
    }
}

/// A loaded view of the workspace root.
///
/// Reloaded every heartbeat so new groups and agents are picked up without
/// restarting the daemon.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: WorkspaceConfig,
    pub groups: BTreeMap<String, GroupConfig>,
    /// Groups whose `group.toml` failed to load, with the error text
    pub invalid_groups: Vec<(String, String)>,
}

impl Workspace {
    /// Load `warden.toml` and discover groups under `root`
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config = WorkspaceConfig::load(root)?;
        let mut groups = BTreeMap::new();
        let mut invalid_groups = Vec::new();

        for (name, dir) in subdirectories(root)? {
            let path = dir.join(GROUP_CONFIG_FILE);
            if !path.is_file() {
                continue;
            }
            match GroupConfig::load(&path) {
                Ok(group) => {
                    groups.insert(name, group);
                }
                Err(e) => invalid_groups.push((name, e.to_string())),
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            groups,
            invalid_groups,
        })
    }

    /// Build a workspace directly (no filesystem access)
    pub fn new(root: impl Into<PathBuf>, config: WorkspaceConfig) -> Self {
        Self {
            root: root.into(),
            config,
            groups: BTreeMap::new(),
            invalid_groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, name: impl Into<String>, group: GroupConfig) -> Self {
        self.groups.insert(name.into(), group);
        self
    }

    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups.get(name)
    }

    /// Prefix resolution for every configured group
    pub fn naming(&self) -> Naming {
        let mut naming = Naming::new(
            &self.root,
            &self.config.session_prefix,
            &self.config.issue_prefix,
        );
        for (name, group) in &self.groups {
            naming = naming.with_group(
                name,
                group.session_prefix.as_deref().unwrap_or(name),
                group.issue_prefix.as_deref().unwrap_or("wd"),
            );
        }
        naming
    }

    /// Named agents of a group, workers first, each sorted by name.
    ///
    /// A missing `raiders/` or `crew/` directory means no agents of that kind.
    pub fn roster(&self, group: &str) -> Result<Vec<AgentIdentity>, ConfigError> {
        let group_dir = self.root.join(group);
        let mut roster = Vec::new();
        for (name, _) in subdirectories(&group_dir.join("raiders"))? {
            if let Ok(id) = AgentIdentity::parse(&format!("{group}/workers/{name}")) {
                roster.push(id);
            }
        }
        for (name, _) in subdirectories(&group_dir.join("crew"))? {
            if let Ok(id) = AgentIdentity::parse(&format!("{group}/crew/{name}")) {
                roster.push(id);
            }
        }
        Ok(roster)
    }
}

/// Sorted `(name, path)` of non-hidden subdirectories; missing dir is empty
fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>, ConfigError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut dirs: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            (!name.starts_with('.')).then(|| (name, entry.path()))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_toml<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
