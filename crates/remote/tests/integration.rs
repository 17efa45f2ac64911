// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end tests against the real `fr-remote` binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::net::TcpListener;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use chrono::Utc;
use fr_core::{
    Category, RemoteSubmitter, Report, ReportPayload, Status, SubmitError, WebSocketSubmitter,
};

/// Kills the server process when dropped.
struct RemoteProcess {
    child: Child,
    url: String,
}

impl Drop for RemoteProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn start_remote(data: &Path, fail_rate: &str) -> RemoteProcess {
    let port = free_port();
    let bind = format!("127.0.0.1:{}", port);
    let child = Command::new(env!("CARGO_BIN_EXE_fr-remote"))
        .args(["--bind", &bind, "--fail-rate", fail_rate])
        .arg("--data")
        .arg(data)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start fr-remote");
    let process = RemoteProcess {
        child,
        url: format!("ws://{}", bind),
    };

    let deadline = Instant::now() + Duration::from_secs(10);
    while std::net::TcpStream::connect(&bind).is_err() {
        assert!(Instant::now() < deadline, "fr-remote did not start");
        std::thread::sleep(Duration::from_millis(50));
    }
    process
}

fn report(id: i64) -> Report {
    Report {
        id,
        remote_id: None,
        payload: ReportPayload::new("Amina", "Central Market", Category::Emergency, "Road blocked"),
        created_at: Utc::now(),
        status: Status::Pending,
        has_attachment: false,
        last_error: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn accepts_and_persists_reports() {
    let data = tempfile::tempdir().unwrap();
    let remote = start_remote(data.path(), "0");
    let submitter = WebSocketSubmitter::new(remote.url.clone());

    assert_eq!(submitter.submit(&report(1)).await.unwrap(), "srv_1");
    assert_eq!(submitter.submit(&report(2)).await.unwrap(), "srv_2");
    assert!(data.path().join("reports.db").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn full_fail_rate_rejects_submissions() {
    let data = tempfile::tempdir().unwrap();
    let remote = start_remote(data.path(), "1");
    let submitter = WebSocketSubmitter::new(remote.url.clone());

    let err = submitter.submit(&report(1)).await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected("Internal Server Error (Simulated)".to_string())
    );
}

#[test]
fn rejects_out_of_range_fail_rate() {
    let output = Command::new(env!("CARGO_BIN_EXE_fr-remote"))
        .args(["--fail-rate", "2"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be between 0.0 and 1.0"));
}
