// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod init;
pub mod list;
pub mod new;
pub mod sync;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fr_core::{
    EngineConfig, ReachabilityProbe, SqliteStore, SyncEngine, TcpProbe, WebSocketSubmitter,
};

use crate::config::{find_work_dir, get_db_path, get_lock_path, Config};
use crate::error::{Error, Result};

pub type Engine = SyncEngine<SqliteStore, WebSocketSubmitter>;

/// Helper to open the report store from the current context.
pub fn open_store() -> Result<(Arc<SqliteStore>, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let store = SqliteStore::open(&get_db_path(&work_dir))?;
    Ok((Arc::new(store), config, work_dir))
}

/// Build a sync engine that submits to the configured remote.
///
/// Runs hold the work dir's sync lock, so `fr sync`, `fr new` and `fr watch`
/// never sync the same store at once.
pub fn build_engine(store: Arc<SqliteStore>, config: &Config, work_dir: &Path) -> Engine {
    let submitter =
        WebSocketSubmitter::with_timeout(config.remote.url.clone(), config.remote.submit_timeout());
    SyncEngine::with_config(
        store,
        Arc::new(submitter),
        EngineConfig::with_batch_size(config.sync.batch_size),
    )
    .with_lock_file(get_lock_path(work_dir))
}

/// Probe for the configured remote.
pub fn remote_probe(config: &Config) -> Result<TcpProbe> {
    Ok(TcpProbe::from_url(
        &config.remote.url,
        config.remote.connect_timeout(),
    )?)
}

/// One-shot reachability check of the configured remote.
pub async fn remote_reachable(config: &Config) -> Result<bool> {
    Ok(remote_probe(config)?.check().await)
}

/// Create the tokio runtime used by commands that talk to the remote.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(format!("tokio: {}", e)))
}

/// Progress sink that prints each line to stdout.
pub fn print_progress(message: &str) {
    println!("{}", message);
}
