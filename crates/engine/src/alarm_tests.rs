// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

const T0: u64 = 1_700_000_000_000;

#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<StdMutex<Vec<u8>>>,
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn three_deaths_in_window_alarm_once() {
    let alarm = MassDeathAlarm::new();
    assert!(alarm.observe("grp-a", T0).is_none());
    assert!(alarm.observe("grp-b", T0 + 5_000).is_none());

    let mass = alarm.observe("grp-c", T0 + 10_000).unwrap();

    assert_eq!(mass.sessions, vec!["grp-a", "grp-b", "grp-c"]);
    assert_eq!(mass.window, Duration::from_secs(30));
    assert!(alarm.recent().is_empty());
}

#[test]
fn cleared_after_alarm() {
    let alarm = MassDeathAlarm::new();
    for (i, s) in ["a", "b", "c"].iter().enumerate() {
        alarm.observe(s, T0 + i as u64 * 1_000);
    }
    assert!(alarm.observe("d", T0 + 4_000).is_none());
    assert!(alarm.observe("e", T0 + 35_000).is_none());
}

#[test]
fn spread_out_deaths_never_alarm() {
    let alarm = MassDeathAlarm::new();
    for i in 0..10u64 {
        assert!(alarm.observe(&format!("s{i}"), T0 + i * 20_000).is_none());
    }
}

#[test]
fn clones_share_the_window() {
    let alarm = MassDeathAlarm::new();
    let other = alarm.clone();
    alarm.observe("a", T0);
    other.observe("b", T0 + 1);
    assert!(alarm.observe("c", T0 + 2).is_some());
}

#[test]
fn custom_threshold() {
    let alarm = MassDeathAlarm::with_window(DeathWindow::new(Duration::from_secs(10), 2));
    alarm.observe("a", T0);
    assert!(alarm.observe("b", T0 + 10_000).is_some());
}

#[test]
fn alarm_emits_structured_event() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let alarm = MassDeathAlarm::new();
        alarm.observe("grp-a", T0);
        alarm.observe("grp-b", T0 + 1_000);
        alarm.observe("grp-c", T0 + 2_000);
    });

    let output = String::from_utf8(logs.logs.lock().unwrap().clone()).unwrap();
    assert_eq!(output.matches("mass session death").count(), 1, "{output}");
    assert!(output.contains(MASS_DEATH_TARGET));
    assert!(output.contains("count=3"));
    assert!(output.contains("window_secs=30"));
    assert!(output.contains("grp-c"));
}
