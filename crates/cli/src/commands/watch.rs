// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `fr watch`: probe the remote and sync each time it comes back.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use fr_core::{
    poll_reachability, spawn_auto_sync, Connectivity, ConnectivityMonitor, ProgressSink,
    RecordStore, SqliteStore, Status,
};
use tokio_util::sync::CancellationToken;

use super::{build_engine, open_store, print_progress, remote_probe, runtime};
use crate::config::Config;
use crate::error::{Error, Result};

pub fn run(interval: Option<u64>) -> Result<()> {
    let (store, config, work_dir) = open_store()?;
    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.sync.probe_interval());

    runtime()?.block_on(watch_impl(store, &config, &work_dir, interval))
}

async fn watch_impl(
    store: Arc<SqliteStore>,
    config: &Config,
    work_dir: &Path,
    interval: Duration,
) -> Result<()> {
    let probe = remote_probe(config)?;
    let engine = Arc::new(build_engine(Arc::clone(&store), config, work_dir));
    let monitor = ConnectivityMonitor::new(Connectivity::Offline);
    let cancel = CancellationToken::new();

    let progress: Arc<dyn ProgressSink> = Arc::new(print_progress);
    let auto_sync = spawn_auto_sync(engine, &monitor, Some(progress), cancel.clone());

    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    println!(
        "Watching {} every {}s ({} pending). Press Ctrl-C to stop.",
        config.remote.url,
        interval.as_secs(),
        store.count_by_status(Status::Pending)?
    );

    poll_reachability(&probe, &monitor, interval, cancel.clone()).await;
    cancel.cancel();
    ctrl_c.abort();

    let runs = auto_sync
        .await
        .map_err(|e| Error::Runtime(format!("auto sync task: {}", e)))?;
    println!(
        "Stopped after {} sync run(s); {} report(s) pending.",
        runs,
        store.count_by_status(Status::Pending)?
    );
    Ok(())
}
