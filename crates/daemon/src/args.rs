// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line handling for `wardend`.
//!
//! Info flags are resolved before any config load or lock acquisition.

use std::path::PathBuf;

pub const USAGE: &str = "Usage: wardend [--root <dir>] [--help | --version]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Run the supervisor; `root` overrides `WARDEN_ROOT` and the cwd
    Run { root: Option<PathBuf> },
    Help,
    Version,
}

impl Invocation {
    /// Parse arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut root = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--version" | "-V" | "-v" => return Ok(Invocation::Version),
                "--help" | "-h" | "help" => return Ok(Invocation::Help),
                "--root" => match args.next() {
                    Some(dir) if !dir.is_empty() => root = Some(PathBuf::from(dir)),
                    _ => return Err("'--root' requires a directory".to_string()),
                },
                other => match other.strip_prefix("--root=") {
                    Some(dir) if !dir.is_empty() => root = Some(PathBuf::from(dir)),
                    _ => return Err(format!("unexpected argument '{other}'")),
                },
            }
        }
        Ok(Invocation::Run { root })
    }
}

pub fn version() -> String {
    format!("wardend {}", env!("CARGO_PKG_VERSION"))
}

pub fn help() -> String {
    [
        version().as_str(),
        "Warden Daemon - keeps a fleet of assistant sessions alive and recoverable",
        "",
        "USAGE:",
        "    wardend [--root <dir>]",
        "",
        "The workspace root defaults to $WARDEN_ROOT, then the current directory.",
        "Send SIGUSR1 to process lifecycle requests without waiting for the",
        "next heartbeat; SIGTERM or SIGINT shuts the daemon down.",
        "",
        "OPTIONS:",
        "    --root <dir>     Workspace root",
        "    -h, --help       Print help information",
        "    -v, --version    Print version information",
    ]
    .join("\n")
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
