// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine value shared by every heartbeat step

use crate::alarm::MassDeathAlarm;
use crate::detect::STALL_TIMEOUT;
use crate::error::RestartError;
use crate::restart::RestartTimings;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use warden_core::Clock;

/// Adapter dependencies
#[derive(Clone)]
pub struct EngineDeps<S, I, M, G> {
    pub sessions: S,
    pub issues: I,
    pub mail: M,
    pub git: G,
}

/// Tunables; defaults are the production values
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub restart: RestartTimings,
    /// Work assigned but no record update for this long counts as stalled
    pub stall_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            restart: RestartTimings::default(),
            stall_timeout: STALL_TIMEOUT,
        }
    }
}

/// Recovery engine, generic over adapters and clock
pub struct Engine<S, I, M, G, C: Clock> {
    pub(crate) sessions: S,
    pub(crate) issues: I,
    pub(crate) mail: M,
    pub(crate) git: G,
    pub(crate) clock: C,
    pub(crate) config: EngineConfig,
    pub(crate) alarm: MassDeathAlarm,
    pub(crate) cancel: CancellationToken,
}

impl<S, I, M, G, C: Clock> Engine<S, I, M, G, C> {
    pub fn new(
        deps: EngineDeps<S, I, M, G>,
        clock: C,
        config: EngineConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sessions: deps.sessions,
            issues: deps.issues,
            mail: deps.mail,
            git: deps.git,
            clock,
            config,
            alarm: MassDeathAlarm::new(),
            cancel,
        }
    }

    /// Share a death window with another component
    pub fn with_alarm(mut self, alarm: MassDeathAlarm) -> Self {
        self.alarm = alarm;
        self
    }

    pub fn alarm(&self) -> &MassDeathAlarm {
        &self.alarm
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Sleep for `duration` unless shutdown starts first
    pub(crate) async fn pause(&self, duration: Duration) -> Result<(), RestartError> {
        if duration.is_zero() {
            return if self.cancel.is_cancelled() {
                Err(RestartError::Cancelled)
            } else {
                Ok(())
            };
        }
        tokio::select! {
            _ = self.cancel.cancelled() => Err(RestartError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Run `fut` unless shutdown starts first
    pub(crate) async fn or_cancel<T>(&self, fut: impl Future<Output = T>) -> Result<T, RestartError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(RestartError::Cancelled),
            value = fut => Ok(value),
        }
    }
}
