// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fr-core: Shared library for the fieldrep incident reporter
//!
//! This crate provides the report model, the durable local store, the
//! WebSocket submitter and wire protocol, and the sync engine used by both
//! the `fr` CLI and the `fr-remote` server.

pub mod connectivity;
pub mod engine;
pub mod error;
pub mod lock;
pub mod progress;
pub mod protocol;
pub mod report;
pub mod store;
pub mod submitter;

#[cfg(test)]
mod test_helpers;

pub use connectivity::{
    poll_reachability, spawn_auto_sync, Connectivity, ConnectivityMonitor, ConnectivityWatcher,
    ReachabilityProbe, TcpProbe,
};
pub use engine::{prioritize, EngineConfig, SyncEngine, SyncSummary, SYNC_BATCH_SIZE};
pub use error::{Error, Result};
pub use lock::SyncLock;
pub use progress::{LogProgress, ProgressSink, Silent};
pub use protocol::{ClientMessage, ServerMessage, WireReport};
pub use report::{Category, NewReport, Report, ReportId, ReportPayload, ReportUpdate, Status};
pub use store::{RecordStore, SqliteStore};
pub use submitter::{RemoteSubmitter, SubmitError, WebSocketSubmitter};
