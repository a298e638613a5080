// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Warden recovery engine: session restarts, lifecycle requests, detectors,
//! the mass-death alarm and the activity watcher.

mod alarm;
mod detect;
pub mod env;
mod error;
mod heartbeat;
mod lifecycle;
pub mod nudge;
mod prompts;
mod restart;
mod runtime;
mod watcher;

pub use alarm::{MassDeathAlarm, MASS_DEATH_TARGET};
pub use detect::{classify, AgentHealth, DetectorReport, Observation, STALL_TIMEOUT};
pub use error::{EngineError, RestartError};
pub use heartbeat::{required_agents, HeartbeatReport};
pub use lifecycle::LifecycleReport;
pub use restart::{RestartOutcome, RestartTimings};
pub use runtime::{Engine, EngineConfig, EngineDeps};
pub use watcher::{ActivityWatcher, WATCH_RETRY};

#[cfg(test)]
mod test_helpers;
