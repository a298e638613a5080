// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! warden-core: domain types for the Warden supervision daemon

pub mod clock;
pub mod config;
pub mod death;
pub mod event;
pub mod identity;
pub mod lifecycle;
pub mod message;
pub mod naming;
pub mod record;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    default_theme, ConfigError, GroupConfig, GroupStatus, SessionTheme, Workspace,
    WorkspaceConfig, GROUP_CONFIG_FILE, WORKSPACE_CONFIG_FILE,
};
pub use death::{
    DeathWindow, MassDeath, SessionDeathRecord, MASS_DEATH_THRESHOLD, MASS_DEATH_WINDOW,
};
pub use event::{ActivityEvent, EventError};
pub use identity::{AgentIdentity, IdentityError, Role};
pub use lifecycle::{
    LifecycleAction, LifecycleParseError, LifecycleRequest, Triage, LIFECYCLE_MAX_AGE,
    LIFECYCLE_PREFIX,
};
pub use message::{Message, OutgoingMessage, Priority};
pub use naming::Naming;
pub use record::{AgentRecord, CleanupState, Issue};
