// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sliding window of recent session deaths.

use std::time::Duration;

pub const MASS_DEATH_WINDOW: Duration = Duration::from_secs(30);
pub const MASS_DEATH_THRESHOLD: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDeathRecord {
    pub session: String,
    pub at_ms: u64,
}

/// Alarm raised when the window fills
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MassDeath {
    pub sessions: Vec<String>,
    pub window: Duration,
}

/// In-memory death records, trimmed on every insert and cleared on alarm
#[derive(Debug, Clone)]
pub struct DeathWindow {
    records: Vec<SessionDeathRecord>,
    window: Duration,
    threshold: usize,
}

impl Default for DeathWindow {
    fn default() -> Self {
        Self::new(MASS_DEATH_WINDOW, MASS_DEATH_THRESHOLD)
    }
}

impl DeathWindow {
    pub fn new(window: Duration, threshold: usize) -> Self {
        Self {
            records: Vec::new(),
            window,
            threshold,
        }
    }

    /// Record a death at `at_ms`; returns the alarm if this one fills the window
    /// with distinct sessions
    pub fn record(&mut self, session: &str, at_ms: u64) -> Option<MassDeath> {
        let window_ms = self.window.as_millis() as u64;
        // One entry per session: a repeat death refreshes its timestamp
        self.records
            .retain(|r| r.session != session && at_ms.saturating_sub(r.at_ms) <= window_ms);
        self.records.push(SessionDeathRecord {
            session: session.to_string(),
            at_ms,
        });

        if self.records.len() < self.threshold {
            return None;
        }
        let sessions = self.records.drain(..).map(|r| r.session).collect();
        Some(MassDeath {
            sessions,
            window: self.window,
        })
    }

    pub fn records(&self) -> &[SessionDeathRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "death_tests.rs"]
mod tests;
