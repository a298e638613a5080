// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Warden daemon library
//!
//! Process-level pieces of `wardend`: argument handling, the lock/PID/state
//! lifecycle and the supervisor that drives one heartbeat per tick.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod args;
pub mod env;
pub mod lifecycle;
pub mod supervisor;

pub use args::{Invocation, USAGE};
pub use lifecycle::{
    read_pid, startup, Config, DaemonState, LifecycleError, DAEMON_DIR, HEARTBEAT_INTERVAL,
};
pub use supervisor::{DaemonEngine, Supervisor};
