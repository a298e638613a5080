// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::process::Stdio;
use tokio::process::Command;

#[tokio::test]
async fn child_lines_arrive_in_order_then_end() {
    let mut cmd = Command::new("printf");
    cmd.arg("a\\nb\\nc\\n").stdout(Stdio::piped()).kill_on_drop(true);
    let child = cmd.spawn().unwrap();

    let mut stream = EventStream::from_child(child, "printf").unwrap();
    let mut seen = Vec::new();
    while let Some(line) = stream.next_line().await.unwrap() {
        seen.push(line);
    }
    assert_eq!(seen, vec!["a", "b", "c"]);
    stream.terminate().await;
}

#[tokio::test]
async fn terminate_kills_long_running_child() {
    let mut cmd = Command::new("sleep");
    cmd.arg("30").stdout(Stdio::piped()).kill_on_drop(true);
    let child = cmd.spawn().unwrap();

    let stream = EventStream::from_child(child, "sleep").unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), stream.terminate())
        .await
        .unwrap();
}

#[tokio::test]
async fn child_without_piped_stdout_is_rejected() {
    let mut cmd = Command::new("true");
    cmd.stdout(Stdio::null());
    let child = cmd.spawn().unwrap();
    assert!(EventStream::from_child(child, "true").is_err());
}

#[tokio::test]
async fn channel_stream_ends_when_sender_drops() {
    let (tx, rx) = mpsc::channel(4);
    let mut stream = EventStream::from_channel(rx);
    tx.send("one".to_string()).await.unwrap();
    drop(tx);
    assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("one"));
    assert_eq!(stream.next_line().await.unwrap(), None);
}
