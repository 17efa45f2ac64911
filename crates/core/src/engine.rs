// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine.
//!
//! A sync run moves as many `pending` reports as possible to `synced`:
//!
//! 1. Select every pending report from the store
//! 2. Order them: text-only before attachments, then oldest first
//! 3. Split the queue into fixed-size batches
//! 4. Submit each batch concurrently; batches run strictly one after another
//! 5. Record each outcome on its own report
//!
//! A failed submit leaves the report `pending` with `last_error` set, so the
//! next run picks it up again. Only one run may be in flight per engine; a
//! call made while another run is active returns immediately. Engines in
//! different processes that share a database are kept apart by a lock file
//! (see [`SyncEngine::with_lock_file`]).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::lock::SyncLock;
use crate::progress::{self, ProgressSink};
use crate::report::{Report, ReportUpdate, Status};
use crate::store::RecordStore;
use crate::submitter::RemoteSubmitter;

/// Default number of reports submitted concurrently.
pub const SYNC_BATCH_SIZE: usize = 5;

/// Configuration for the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum reports per batch (at least 1).
    pub batch_size: usize,
}

impl EngineConfig {
    /// Configuration with the given batch size; zero is raised to one.
    pub fn with_batch_size(batch_size: usize) -> Self {
        EngineConfig {
            batch_size: batch_size.max(1),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            batch_size: SYNC_BATCH_SIZE,
        }
    }
}

/// Tally of one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Pending reports selected at the start of the run.
    pub selected: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl SyncSummary {
    /// Reports attempted so far.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Sort reports into submission order.
///
/// Ascending by `(has_attachment, created_at)`, with the local id as a final
/// tie-breaker so the order is total.
pub fn prioritize(mut reports: Vec<Report>) -> Vec<Report> {
    reports.sort_by_key(Report::priority_key);
    reports
}

/// Releases the single-run flag when a run ends, however it ends.
struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Orchestrates sync runs between a [`RecordStore`] and a [`RemoteSubmitter`].
pub struct SyncEngine<S, R> {
    store: Arc<S>,
    submitter: Arc<R>,
    config: EngineConfig,
    running: AtomicBool,
    lock_path: Option<PathBuf>,
}

impl<S: RecordStore, R: RemoteSubmitter> SyncEngine<S, R> {
    /// Create an engine with the default batch size.
    pub fn new(store: Arc<S>, submitter: Arc<R>) -> Self {
        Self::with_config(store, submitter, EngineConfig::default())
    }

    pub fn with_config(store: Arc<S>, submitter: Arc<R>, config: EngineConfig) -> Self {
        SyncEngine {
            store,
            submitter,
            config: EngineConfig::with_batch_size(config.batch_size),
            running: AtomicBool::new(false),
            lock_path: None,
        }
    }

    /// Also hold an exclusive lock on `path` for the length of every run.
    ///
    /// A run that finds the lock held elsewhere is skipped, exactly as if
    /// this engine were already running.
    pub fn with_lock_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = Some(path.into());
        self
    }

    pub fn lock_path(&self) -> Option<&Path> {
        self.lock_path.as_deref()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// True while a run is in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run a sync, returning the tally.
    ///
    /// If another run is already in flight this returns an empty summary
    /// without touching the store or the progress sink. Never fails: store and
    /// submit errors are logged and reflected in the tally.
    pub async fn run_sync(&self, progress: Option<&dyn ProgressSink>) -> SyncSummary {
        self.try_run_sync(progress).await.unwrap_or_default()
    }

    /// Like [`run_sync`](Self::run_sync), but returns `None` when the call was
    /// dropped because another run was in flight, here or behind the lock file.
    pub async fn try_run_sync(&self, progress: Option<&dyn ProgressSink>) -> Option<SyncSummary> {
        let Some(_guard) = self.try_begin() else {
            debug!("sync already in progress, skipping");
            return None;
        };
        let _lock = match &self.lock_path {
            Some(path) => match SyncLock::try_acquire(path) {
                Ok(Some(lock)) => Some(lock),
                Ok(None) => {
                    debug!(lock = %path.display(), "sync running in another process, skipping");
                    return None;
                }
                Err(e) => {
                    error!(lock = %path.display(), error = %e, "failed to take sync lock");
                    return Some(SyncSummary::default());
                }
            },
            None => None,
        };
        Some(self.run_exclusive(progress).await)
    }

    fn try_begin(&self) -> Option<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                running: &self.running,
            })
    }

    async fn run_exclusive(&self, progress: Option<&dyn ProgressSink>) -> SyncSummary {
        let mut summary = SyncSummary::default();

        let pending = match self.store.list_by_status(Status::Pending) {
            Ok(pending) => pending,
            Err(e) => {
                error!(error = %e, "failed to select pending reports");
                return summary;
            }
        };
        if pending.is_empty() {
            return summary;
        }

        let queue = prioritize(pending);
        let total = queue.len();
        summary.selected = total;
        info!(total, batch_size = self.config.batch_size, "sync run started");
        notify(progress, &progress::starting(total));

        for batch in queue.chunks(self.config.batch_size) {
            let outcomes = join_all(batch.iter().map(|report| self.attempt(report))).await;
            for synced in outcomes {
                if synced {
                    summary.succeeded += 1;
                } else {
                    summary.failed += 1;
                }
            }
            notify(progress, &progress::batch_done(summary.processed(), total));
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "sync run finished"
        );
        notify(
            progress,
            &progress::complete(summary.succeeded, summary.failed),
        );
        summary
    }

    /// Submit one report and record the outcome. Returns true if it synced.
    async fn attempt(&self, report: &Report) -> bool {
        match self.submitter.submit(report).await {
            Ok(remote_id) => {
                debug!(id = report.id, remote_id = %remote_id, "report synced");
                match self.store.update(report.id, ReportUpdate::synced(remote_id)) {
                    Ok(()) => true,
                    Err(e) => {
                        error!(id = report.id, error = %e, "failed to record sync acknowledgment");
                        false
                    }
                }
            }
            Err(e) => {
                warn!(id = report.id, error = %e, "failed to sync report");
                if let Err(store_err) = self
                    .store
                    .update(report.id, ReportUpdate::failed(e.to_string()))
                {
                    error!(id = report.id, error = %store_err, "failed to record sync error");
                }
                false
            }
        }
    }
}

fn notify(progress: Option<&dyn ProgressSink>, message: &str) {
    if let Some(sink) = progress {
        sink.report(message);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
