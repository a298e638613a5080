// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::SessionAdapter;
use crate::error::AdapterError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use warden_core::SessionTheme;

/// Recorded session call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    NewSession {
        name: String,
        cwd: PathBuf,
        initial_command: Option<String>,
    },
    Kill {
        name: String,
    },
    SetEnv {
        name: String,
        key: String,
        value: String,
    },
    SendKeys {
        name: String,
        text: String,
    },
    Signal {
        name: String,
        text: String,
    },
    Press {
        name: String,
        key: String,
    },
    SetTheme {
        name: String,
        theme: SessionTheme,
    },
}

/// Fake session state
#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    pub cwd: PathBuf,
    pub env: BTreeMap<String, String>,
    pub assistant_alive: bool,
    pub typed: Vec<String>,
    pub nudges: Vec<String>,
    pub pane: String,
}

struct FakeSessionState {
    sessions: BTreeMap<String, FakeSession>,
    calls: Vec<SessionCall>,
    /// Typing into a session starts its assistant
    launch_starts_assistant: bool,
    fail_new_session: HashSet<String>,
}

/// Fake session adapter for testing
#[derive(Clone)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl Default for FakeSessionAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSessionState {
                sessions: BTreeMap::new(),
                calls: Vec::new(),
                launch_starts_assistant: true,
                fail_new_session: HashSet::new(),
            })),
        }
    }
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Get a session by name
    pub fn get_session(&self, name: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(name).cloned()
    }

    pub fn session_names(&self) -> Vec<String> {
        self.inner.lock().sessions.keys().cloned().collect()
    }

    /// Add a pre-existing session
    pub fn add_session(&self, name: &str, assistant_alive: bool) {
        self.inner.lock().sessions.insert(
            name.to_string(),
            FakeSession {
                assistant_alive,
                ..FakeSession::default()
            },
        );
    }

    /// Make a session disappear, as if its server died
    pub fn remove_session(&self, name: &str) {
        self.inner.lock().sessions.remove(name);
    }

    pub fn set_assistant_alive(&self, name: &str, alive: bool) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session.assistant_alive = alive;
        }
    }

    pub fn set_pane(&self, name: &str, pane: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session.pane = pane.to_string();
        }
    }

    /// Whether typed startup commands bring the assistant up (default: true)
    pub fn set_launch_starts_assistant(&self, starts: bool) {
        self.inner.lock().launch_starts_assistant = starts;
    }

    /// Make `new_session` fail for this name
    pub fn fail_new_session(&self, name: &str) {
        self.inner.lock().fail_new_session.insert(name.to_string());
    }

    fn with_session<T>(
        &self,
        name: &str,
        call: SessionCall,
        f: impl FnOnce(&mut FakeSession, bool) -> T,
    ) -> Result<T, AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(call);
        let starts = inner.launch_starts_assistant;
        match inner.sessions.get_mut(name) {
            Some(session) => Ok(f(session, starts)),
            None => Err(AdapterError::NotFound(name.to_string())),
        }
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn has_session(&self, name: &str) -> Result<bool, AdapterError> {
        Ok(self.inner.lock().sessions.contains_key(name))
    }

    async fn is_assistant_alive(&self, name: &str) -> Result<bool, AdapterError> {
        Ok(self
            .inner
            .lock()
            .sessions
            .get(name)
            .is_some_and(|s| s.assistant_alive))
    }

    async fn kill_session(&self, name: &str) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Kill {
            name: name.to_string(),
        });
        inner.sessions.remove(name);
        Ok(())
    }

    async fn new_session(
        &self,
        name: &str,
        cwd: &Path,
        initial_command: Option<&str>,
    ) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::NewSession {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            initial_command: initial_command.map(str::to_string),
        });
        if inner.fail_new_session.contains(name) {
            return Err(AdapterError::ExternalError {
                command: "new-session".to_string(),
                stderr: "injected failure".to_string(),
                exit: Some(1),
            });
        }
        if inner.sessions.contains_key(name) {
            return Err(AdapterError::ExternalError {
                command: "new-session".to_string(),
                stderr: format!("duplicate session: {name}"),
                exit: Some(1),
            });
        }
        inner.sessions.insert(
            name.to_string(),
            FakeSession {
                cwd: cwd.to_path_buf(),
                assistant_alive: initial_command.is_some(),
                ..FakeSession::default()
            },
        );
        Ok(())
    }

    async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<(), AdapterError> {
        let call = SessionCall::SetEnv {
            name: name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        };
        self.with_session(name, call, |s, _| {
            s.env.insert(key.to_string(), value.to_string());
        })
    }

    async fn send_keys(&self, name: &str, text: &str) -> Result<(), AdapterError> {
        let call = SessionCall::SendKeys {
            name: name.to_string(),
            text: text.to_string(),
        };
        self.with_session(name, call, |s, starts| {
            s.typed.push(text.to_string());
            if starts {
                s.assistant_alive = true;
            }
        })
    }

    async fn signal(&self, name: &str, text: &str) -> Result<(), AdapterError> {
        let call = SessionCall::Signal {
            name: name.to_string(),
            text: text.to_string(),
        };
        self.with_session(name, call, |s, _| s.nudges.push(text.to_string()))
    }

    async fn press(&self, name: &str, key: &str) -> Result<(), AdapterError> {
        let call = SessionCall::Press {
            name: name.to_string(),
            key: key.to_string(),
        };
        self.with_session(name, call, |_, _| ())
    }

    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, AdapterError> {
        let inner = self.inner.lock();
        let session = inner
            .sessions
            .get(name)
            .ok_or_else(|| AdapterError::NotFound(name.to_string()))?;
        let all: Vec<&str> = session.pane.lines().collect();
        let start = all.len().saturating_sub(lines as usize);
        Ok(all[start..].join("\n"))
    }

    async fn wait_for_shell_ready(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<(), AdapterError> {
        if self.is_assistant_alive(name).await? {
            Ok(())
        } else {
            Err(AdapterError::Timeout {
                command: format!("waiting for assistant in {name}"),
                after: timeout,
            })
        }
    }

    async fn set_theme(&self, name: &str, theme: &SessionTheme) -> Result<(), AdapterError> {
        let call = SessionCall::SetTheme {
            name: name.to_string(),
            theme: theme.clone(),
        };
        self.with_session(name, call, |_, _| ())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
