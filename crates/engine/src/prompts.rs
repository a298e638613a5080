// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive prompts the assistant may show right after launch

use std::time::Duration;
use warden_adapters::{AdapterError, SessionAdapter};

/// Text that identifies the bypass-permissions warning dialog
const BYPASS_MARKERS: &[&str] = &["Bypass Permissions mode", "Yes, I accept"];

/// Lines of pane history to inspect per poll
const CAPTURE_LINES: u32 = 50;

/// Poll the pane for the bypass-permissions dialog and accept it.
///
/// The dialog defaults to "No", so acceptance is `Down` then `Enter`.
/// Returns whether the dialog was seen.
pub(crate) async fn accept_permissions_dialog<S: SessionAdapter>(
    sessions: &S,
    session: &str,
    attempts: usize,
    interval: Duration,
) -> Result<bool, AdapterError> {
    for attempt in 0..attempts {
        if attempt > 0 {
            tokio::time::sleep(interval).await;
        }

        let pane = match sessions.capture_pane(session, CAPTURE_LINES).await {
            Ok(pane) => pane,
            Err(AdapterError::NotFound(name)) => return Err(AdapterError::NotFound(name)),
            Err(_) => continue,
        };

        if BYPASS_MARKERS.iter().all(|m| pane.contains(m)) {
            sessions.press(session, "Down").await?;
            sessions.press(session, "Enter").await?;
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[path = "prompts_tests.rs"]
mod tests;
