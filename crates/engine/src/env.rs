// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment injected into a launched session, and the startup command
//! that exports it in the assistant's parent shell.

use warden_core::{AgentIdentity, Naming, Workspace};

pub const ROLE_TAG: &str = "ROLE_TAG";
pub const GROUP: &str = "GROUP";
pub const AGENT_NAME: &str = "AGENT_NAME";
pub const ACTOR_ADDRESS: &str = "ACTOR_ADDRESS";
pub const WORKSPACE_ROOT: &str = "WORKSPACE_ROOT";
pub const SESSION_ID_VAR_NAME: &str = "SESSION_ID_VAR_NAME";
pub const NO_BACKGROUND_DAEMON: &str = "NO_BACKGROUND_DAEMON";
pub const GIT_AUTHOR_NAME: &str = "GIT_AUTHOR_NAME";

/// Ordered `(key, value)` pairs for the session of `id`.
///
/// `GROUP` and `AGENT_NAME` are omitted when the identity has none.
pub fn session_env(workspace: &Workspace, id: &AgentIdentity) -> Vec<(String, String)> {
    let mut env = vec![(ROLE_TAG.to_string(), id.role().to_string())];
    if let Some(group) = id.group() {
        env.push((GROUP.to_string(), group.to_string()));
    }
    if let Some(name) = id.name() {
        env.push((AGENT_NAME.to_string(), name.to_string()));
    }
    env.push((ACTOR_ADDRESS.to_string(), id.address()));
    env.push((
        WORKSPACE_ROOT.to_string(),
        workspace.root.display().to_string(),
    ));
    env.push((
        SESSION_ID_VAR_NAME.to_string(),
        workspace.config.session_id_var.clone(),
    ));
    if Naming::suppresses_background_daemon(id.role()) {
        env.push((NO_BACKGROUND_DAEMON.to_string(), "1".to_string()));
    }
    env.push((GIT_AUTHOR_NAME.to_string(), id.author_name()));
    env
}

/// `export K='v' ... && <assistant>`, typed into the session's shell
pub fn startup_command(env: &[(String, String)], assistant_command: &str) -> String {
    if env.is_empty() {
        return assistant_command.to_string();
    }
    let exports: Vec<String> = env
        .iter()
        .map(|(key, value)| format!("{key}={}", shell_quote(value)))
        .collect();
    format!("export {} && {assistant_command}", exports.join(" "))
}

/// Single-quote `value` for a POSIX shell
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
