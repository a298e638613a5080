//! Daemon help and version specs
//!
//! Verify wardend --help, --version, and argument errors work without
//! acquiring the daemon lock (no startup attempt).

use crate::prelude::*;
use assert_cmd::Command;

fn wardend() -> Command {
    Command::new(wardend_binary())
}

fn stdout_of(args: &[&str]) -> String {
    let assert = wardend().args(args).assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn version_flags_show_version() {
    for flag in ["--version", "-v", "-V"] {
        let stdout = stdout_of(&[flag]);
        assert!(
            stdout.starts_with(concat!("wardend ", env!("CARGO_PKG_VERSION"))),
            "{flag}: got {stdout}"
        );
    }
}

#[test]
fn help_shows_usage() {
    for flag in ["--help", "-h", "help"] {
        let stdout = stdout_of(&[flag]);
        assert!(stdout.contains("USAGE:"), "{flag}: got {stdout}");
        assert!(stdout.contains("--root <dir>"), "{flag}: got {stdout}");
    }
}

#[test]
fn help_does_not_touch_the_workspace() {
    let workspace = Workspace::empty();
    let root = workspace.path().to_string_lossy().into_owned();
    wardend()
        .args(["--root", root.as_str(), "--help"])
        .assert()
        .success();
    assert!(!workspace.path().join("daemon").exists());
}

#[test]
fn unexpected_argument_fails() {
    let assert = wardend().arg("start").assert().failure().code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("unexpected argument 'start'"), "got {stderr}");
    assert!(stderr.contains("Usage: wardend"), "got {stderr}");
}

#[test]
fn root_flag_requires_a_value() {
    wardend().arg("--root").assert().failure().code(1);
}
