// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::net::SocketAddr;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use fr_core::{ClientMessage, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn fr() -> Command {
    cargo_bin_cmd!("fr")
}

/// A ws:// URL on a port nobody listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}", addr)
}

/// Helper to create an initialized temp directory pointing at `remote`
pub fn init_temp_with(remote: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fr().arg("init")
        .arg("--remote")
        .arg(remote)
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory whose remote is offline
pub fn init_temp() -> TempDir {
    init_temp_with(&unreachable_url())
}

/// Helper to file a report and return its id
pub fn create_report(temp: &TempDir, name: &str, category: &str, attachment: bool) -> i64 {
    let mut cmd = fr();
    cmd.args(["new", "--name", name, "--location", "Central Market"])
        .args(["--category", category, "--description", "Road blocked"])
        .args(["--no-sync", "-o", "id"]);
    if attachment {
        cmd.arg("--attachment");
    }
    let output = cmd.current_dir(temp.path()).output().unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).trim().parse().unwrap()
}

/// Parse `fr list -o json` output.
pub fn list_json(temp: &TempDir) -> serde_json::Value {
    let output = fr()
        .args(["list", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

/// How the test remote answers submissions.
#[derive(Clone, Copy)]
pub enum RemoteMode {
    AcceptAll,
    RejectAll,
}

/// Start a WebSocket remote on a background thread and return its ws:// URL.
///
/// The server lives until the test process exits.
pub fn spawn_remote(mode: RemoteMode) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, mode));
            }
        });
    });

    format!("ws://{}", addr)
}

async fn serve(stream: tokio::net::TcpStream, mode: RemoteMode) {
    // Reachability probes connect and hang up without a handshake.
    let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    let (mut sink, mut source) = ws.split();
    while let Some(Ok(Message::Text(text))) = source.next().await {
        let reply = match ClientMessage::from_json(&text) {
            Ok(ClientMessage::Submit { request_id, report }) => match mode {
                RemoteMode::AcceptAll => {
                    ServerMessage::accepted(request_id, format!("srv_{}", report.local_id))
                }
                RemoteMode::RejectAll => {
                    ServerMessage::rejected(request_id, "Internal Server Error (Simulated)")
                }
            },
            Ok(ClientMessage::Ping { id }) => ServerMessage::pong(id),
            Err(e) => ServerMessage::error(e.to_string()),
        };
        let json = reply.to_json().unwrap();
        if sink.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }
}
