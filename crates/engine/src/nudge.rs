// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup nudges typed into a freshly (re)started assistant.
//!
//! The first nudge becomes the session's visible title in the assistant's
//! history picker, so it leads with the address.

use warden_core::{AgentIdentity, Role};

/// Nudge #1: find the predecessor session's handoff before doing anything
pub fn predecessor_nudge(id: &AgentIdentity) -> String {
    format!(
        "[warden] {} session start: read your predecessor's handoff in your inbox and \
         the notes on your assigned work before acting.",
        id.address()
    )
}

/// Nudge #2: role-specific propulsion
pub fn propulsion_nudge(id: &AgentIdentity) -> String {
    let directive = match id.role() {
        Role::Overseer => "Review fleet health and any escalations in your inbox now.",
        Role::Coordinator => "Check your inbox and route any pending work now.",
        Role::Observer => "Patrol your group now: check agent health and your inbox.",
        Role::Merger => "If the merge queue has entries, process them now.",
        Role::Crew | Role::Worker => {
            "If work is on your queue, run it now. Otherwise check your inbox."
        }
    };
    format!("[warden] {directive}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudges_are_single_line() {
        for id in [
            AgentIdentity::Overseer,
            AgentIdentity::Coordinator,
            AgentIdentity::observer("grp"),
            AgentIdentity::merger("grp"),
            AgentIdentity::crew("grp", "max"),
            AgentIdentity::worker("grp", "n1"),
        ] {
            assert!(!predecessor_nudge(&id).contains('\n'));
            assert!(!propulsion_nudge(&id).contains('\n'));
        }
    }

    #[test]
    fn predecessor_nudge_leads_with_address() {
        let nudge = predecessor_nudge(&AgentIdentity::worker("grp", "n1"));
        assert!(nudge.starts_with("[warden] grp/workers/n1 "));
    }

    #[test]
    fn worker_propulsion_mentions_queue() {
        assert!(propulsion_nudge(&AgentIdentity::worker("grp", "n1")).contains("queue"));
    }
}
