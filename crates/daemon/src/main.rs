// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Warden Daemon (wardend)
//!
//! Background process that keeps the agent fleet alive.
//!
//! Architecture:
//! - Activity watcher: spawned task following the issue store's event stream
//! - Supervisor loop: main task running one heartbeat per tick, a lifecycle
//!   pass on SIGUSR1, and graceful shutdown on SIGTERM/SIGINT

use std::time::Duration;

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use warden_adapters::{BdIssueStore, CliGitAdapter, CliMailAdapter, TmuxAdapter, TracedSession};
use warden_core::{SystemClock, Workspace, WorkspaceConfig};
use warden_daemon::{
    args, lifecycle, read_pid, Config, DaemonEngine, Invocation, LifecycleError, Supervisor,
    USAGE,
};
use warden_engine::{ActivityWatcher, EngineConfig, EngineDeps};

/// How long shutdown waits for the watcher to stop its stream
const WATCHER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    let root = match Invocation::parse(std::env::args().skip(1)) {
        Ok(Invocation::Version) => {
            println!("{}", args::version());
            return Ok(());
        }
        Ok(Invocation::Help) => {
            println!("{}", args::help());
            return Ok(());
        }
        Ok(Invocation::Run { root }) => root,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let config = Config::load(root)?;

    // Write startup marker to log (before tracing setup, so it is never lost)
    write_startup_marker(&config)?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!(root = %config.root.display(), "Starting warden daemon");

    let mut daemon = match lifecycle::startup(&config) {
        Ok(daemon) => daemon,
        Err(LifecycleError::AlreadyRunning(e)) => {
            let pid = read_pid(&config.pid_path);
            let message = match pid {
                Some(pid) => format!("wardend is already running (pid: {pid})"),
                None => "wardend is already running".to_string(),
            };
            // Synchronous so the line lands even though we exit immediately
            write_log_line(&config, &format!("ERROR {message}: {e}"));
            eprintln!("{message}");
            eprintln!("  root: {}", config.root.display());
            std::process::exit(1);
        }
        Err(e) => {
            write_log_line(&config, &format!("ERROR Failed to start daemon: {e}"));
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let cancel = CancellationToken::new();

    // The completion command is read once; other settings are reloaded per tick
    let workspace_config = match Workspace::load(&config.root) {
        Ok(workspace) => workspace.config,
        Err(e) => {
            warn!(error = %e, "cannot load workspace config, using defaults for startup");
            WorkspaceConfig::default()
        }
    };

    let issues = BdIssueStore::new(&config.root, workspace_config.completion_command)
        .with_cancel(cancel.clone());
    let engine: DaemonEngine = warden_engine::Engine::new(
        EngineDeps {
            sessions: TracedSession::new(TmuxAdapter::new().with_cancel(cancel.clone())),
            issues: issues.clone(),
            mail: CliMailAdapter::new(&config.root).with_cancel(cancel.clone()),
            git: CliGitAdapter::new().with_cancel(cancel.clone()),
        },
        SystemClock,
        EngineConfig::default(),
        cancel.clone(),
    );
    let supervisor = Supervisor::new(engine, &config.root);

    // Set up signal handlers
    let sigterm = signal(SignalKind::terminate())?;
    let sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;
    spawn_shutdown_listener(sigterm, sigint, cancel.clone());

    let watcher = tokio::spawn(ActivityWatcher::new(issues, cancel.clone()).run());

    info!(
        pid = std::process::id(),
        heartbeat_secs = config.heartbeat.as_secs_f64(),
        "Daemon ready",
    );

    // NOTE: Must be created outside the loop - tokio::select! re-evaluates
    // branches on each iteration, so a sleep() inside would restart on
    // every lifecycle kick. The first tick fires immediately.
    let mut heartbeat = tokio::time::interval(config.heartbeat);
    heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // SIGTERM/SIGINT; an in-flight heartbeat observes the same token
            _ = cancel.cancelled() => break,

            // Lifecycle kick: drain the inbox without waiting for the next tick
            _ = sigusr1.recv() => {
                info!("Received SIGUSR1, processing lifecycle requests");
                supervisor.lifecycle().await;
            }

            _ = heartbeat.tick() => {
                supervisor.heartbeat(&mut daemon).await;
            }
        }
    }

    // Graceful shutdown: wait for the watcher, then release the daemon's files
    match tokio::time::timeout(WATCHER_SHUTDOWN_TIMEOUT, watcher).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "activity watcher task failed"),
        Err(_) => warn!("activity watcher did not stop in time"),
    }
    daemon.shutdown();
    info!("Daemon stopped");
    Ok(())
}

/// Cancel `cancel` on the first SIGTERM or SIGINT
fn spawn_shutdown_listener(mut sigterm: Signal, mut sigint: Signal, cancel: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
            _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
        }
        cancel.cancel();
    });
}

/// Startup marker prefix written to log before anything else.
/// Full format: "--- wardend: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- wardend: starting (pid: ";

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    // Create log directory if needed
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Append a line to the log synchronously.
/// Used for startup failures, where the non-blocking writer may not flush
/// before the process exits.
fn write_log_line(config: &Config, line: &str) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "{line}");
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let invalid = || LifecycleError::LogPath(config.log_path.clone());
    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or_else(invalid)?,
        config.log_path.file_name().ok_or_else(invalid)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}
