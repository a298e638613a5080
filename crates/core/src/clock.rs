// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Injectable time source.
//!
//! Stall detection, lifecycle freshness and the mass-death window all read
//! time through [`Clock`] so tests can drive them deterministically.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of monotonic and wall-clock time
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic instant, for measuring elapsed durations
    fn now(&self) -> Instant;

    /// Milliseconds since the Unix epoch, for comparing against external timestamps
    fn epoch_ms(&self) -> u64;
}

/// Real clock backed by the operating system
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

struct FakeClockState {
    instant: Instant,
    epoch_ms: u64,
}

/// Manually driven clock for tests.
///
/// `advance` moves both the monotonic and the epoch reading together.
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeClockState>>,
}

/// Epoch reading a fresh [`FakeClock`] starts at (2023-11-14T22:13:20Z)
const FAKE_EPOCH_START_MS: u64 = 1_700_000_000_000;

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClockState {
                instant: Instant::now(),
                epoch_ms: FAKE_EPOCH_START_MS,
            })),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        let mut state = self.inner.lock();
        state.instant += by;
        state.epoch_ms += by.as_millis() as u64;
    }

    /// Pin the wall-clock reading without touching the monotonic one
    pub fn set_epoch_ms(&self, epoch_ms: u64) {
        self.inner.lock().epoch_ms = epoch_ms;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.lock().instant
    }

    fn epoch_ms(&self) -> u64 {
        self.inner.lock().epoch_ms
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
