// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the recovery engine

use std::path::PathBuf;
use thiserror::Error;
use warden_adapters::AdapterError;
use warden_core::{ConfigError, IdentityError};

/// Why a session restart did not complete
#[derive(Debug, Error)]
pub enum RestartError {
    /// Soft refusal: the group is parked, docked or has auto-restart off
    #[error("{identity} not restarted: {reason}")]
    NonOperational { identity: String, reason: String },
    #[error("group not configured: {0}")]
    UnknownGroup(String),
    #[error("refusing to start {identity} on stale code: {source}")]
    StaleCodeRefused {
        identity: String,
        source: AdapterError,
    },
    #[error("cannot prepare work dir {}: {source}", .path.display())]
    WorkDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("assistant in {session} did not start: {source}")]
    AssistantNotReady {
        session: String,
        source: AdapterError,
    },
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("restart cancelled")]
    Cancelled,
}

impl RestartError {
    /// Soft refusals are logged at info and never reported to observers
    pub fn is_soft(&self) -> bool {
        matches!(self, RestartError::NonOperational { .. })
    }
}

/// Errors that abort one engine step (never the heartbeat)
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Restart(#[from] RestartError),
}
