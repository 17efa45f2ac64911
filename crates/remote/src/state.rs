// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the server's report database and the failure injection knob for
//! shared access across connections.

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::Mutex;

use fr_core::protocol::WireReport;
use fr_core::{NewReport, ReportPayload, Result, SqliteStore};

/// Message sent with an injected failure.
pub const SIMULATED_FAILURE: &str = "Internal Server Error (Simulated)";

/// Shared server state containing the received reports.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// Received reports. Writes are serialized so ids are assigned in order.
    store: Mutex<SqliteStore>,
    /// Fraction of submissions to reject, in `[0, 1]`.
    fail_rate: f64,
}

impl ServerState {
    /// Creates server state with its database in the given directory.
    pub fn new(data_dir: &Path, fail_rate: f64) -> Result<Self> {
        let store = SqliteStore::open(&data_dir.join("reports.db"))?;
        Ok(Self::with_store(store, fail_rate))
    }

    pub fn with_store(store: SqliteStore, fail_rate: f64) -> Self {
        ServerState {
            inner: Arc::new(ServerStateInner {
                store: Mutex::new(store),
                fail_rate: fail_rate.clamp(0.0, 1.0),
            }),
        }
    }

    pub fn fail_rate(&self) -> f64 {
        self.inner.fail_rate
    }

    /// Roll for an injected failure.
    pub fn should_fail(&self) -> bool {
        self.inner.fail_rate > 0.0 && rand::rng().random_bool(self.inner.fail_rate)
    }

    /// Store a submitted report and return the id assigned to it.
    ///
    /// Every accepted submission gets a fresh id, including resubmissions of
    /// a report the client did not see acknowledged.
    pub async fn accept(&self, report: WireReport) -> Result<String> {
        let payload = ReportPayload::new(
            report.name,
            report.location,
            report.category,
            report.description,
        );
        payload.validate()?;

        let store = self.inner.store.lock().await;
        let (_, remote_id) = store.insert_synced(
            NewReport::with_created_at(payload, report.has_attachment, report.created_at),
            |id| format!("srv_{}", id),
        )?;
        Ok(remote_id)
    }

    /// Number of reports stored so far.
    #[cfg(test)]
    pub async fn report_count(&self) -> Result<usize> {
        self.count(fr_core::Status::Synced).await
    }

    #[cfg(test)]
    pub async fn count(&self, status: fr_core::Status) -> Result<usize> {
        use fr_core::RecordStore;

        let store = self.inner.store.lock().await;
        store.count_by_status(status)
    }
}
