// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse(args: &[&str]) -> Result<Invocation, String> {
    Invocation::parse(args.iter().map(|s| s.to_string()))
}

#[yare::parameterized(
    long_version  = { &["--version"], Invocation::Version },
    short_version = { &["-V"], Invocation::Version },
    lower_version = { &["-v"], Invocation::Version },
    long_help     = { &["--help"], Invocation::Help },
    short_help    = { &["-h"], Invocation::Help },
    word_help     = { &["help"], Invocation::Help },
    help_wins     = { &["--root", "/w", "--help"], Invocation::Help },
    no_args       = { &[], Invocation::Run { root: None } },
)]
fn info_flags(args: &[&str], expected: Invocation) {
    assert_eq!(parse(args).unwrap(), expected);
}

#[test]
fn root_flag_takes_a_directory() {
    let expected = Invocation::Run {
        root: Some(PathBuf::from("/srv/town")),
    };
    assert_eq!(parse(&["--root", "/srv/town"]).unwrap(), expected);
    assert_eq!(parse(&["--root=/srv/town"]).unwrap(), expected);
}

#[yare::parameterized(
    missing_dir = { &["--root"] },
    empty_dir   = { &["--root="] },
    unknown     = { &["--daemonize"] },
    positional  = { &["start"] },
)]
fn rejected(args: &[&str]) {
    assert!(parse(args).is_err());
}

#[test]
fn help_mentions_the_lifecycle_signal() {
    let text = help();
    assert!(text.starts_with("wardend "));
    assert!(text.contains("SIGUSR1"));
    assert!(text.contains("--root"));
}
