// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mass-failure alarm over recent session deaths

use parking_lot::Mutex;
use std::sync::Arc;
use warden_core::{DeathWindow, MassDeath, SessionDeathRecord};

/// Tracing target of the mass-death event
pub const MASS_DEATH_TARGET: &str = "warden::mass_death";

/// Shared sliding window of session deaths.
///
/// The lock is held only for insert-trim-check, never across an await.
#[derive(Clone, Default)]
pub struct MassDeathAlarm {
    window: Arc<Mutex<DeathWindow>>,
}

impl MassDeathAlarm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: DeathWindow) -> Self {
        Self {
            window: Arc::new(Mutex::new(window)),
        }
    }

    /// Record a death; emits one structured event when the window fills
    pub fn observe(&self, session: &str, at_ms: u64) -> Option<MassDeath> {
        let alarm = self.window.lock().record(session, at_ms);
        if let Some(ref mass) = alarm {
            tracing::error!(
                target: MASS_DEATH_TARGET,
                count = mass.sessions.len(),
                window_secs = mass.window.as_secs(),
                sessions = ?mass.sessions,
                "mass session death",
            );
        }
        alarm
    }

    /// Deaths currently inside the window
    pub fn recent(&self) -> Vec<SessionDeathRecord> {
        self.window.lock().records().to_vec()
    }
}

#[cfg(test)]
#[path = "alarm_tests.rs"]
mod tests;
