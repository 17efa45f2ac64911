// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::Arc;

use fr_core::{LogProgress, ProgressSink, RecordStore, SqliteStore, Status, SyncSummary};
use serde::Serialize;

use super::{build_engine, open_store, print_progress, remote_reachable, runtime};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;

/// Result of one `fr sync`.
#[derive(Debug, Serialize)]
pub(crate) struct SyncReport {
    pub remote: String,
    pub reachable: bool,
    /// True if another process was already syncing this store.
    pub skipped: bool,
    #[serde(flatten)]
    pub summary: SyncSummary,
    /// Reports still pending after the run.
    pub pending: usize,
}

pub fn run(output: OutputFormat) -> Result<()> {
    let (store, config, work_dir) = open_store()?;
    let text = output == OutputFormat::Text;
    let sink: &dyn ProgressSink = if text { &print_progress } else { &LogProgress };

    let report = runtime()?.block_on(sync_impl(store, &config, &work_dir, sink))?;

    if text {
        println!("{}", format_outcome(&report));
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Run one sync if the remote is reachable.
pub(crate) async fn sync_impl(
    store: Arc<SqliteStore>,
    config: &Config,
    work_dir: &Path,
    progress: &dyn ProgressSink,
) -> Result<SyncReport> {
    let reachable = remote_reachable(config).await?;
    let outcome = if reachable {
        build_engine(Arc::clone(&store), config, work_dir)
            .try_run_sync(Some(progress))
            .await
    } else {
        tracing::warn!(remote = %config.remote.url, "remote unreachable, skipping sync");
        Some(SyncSummary::default())
    };

    Ok(SyncReport {
        remote: config.remote.url.clone(),
        reachable,
        skipped: outcome.is_none(),
        summary: outcome.unwrap_or_default(),
        pending: store.count_by_status(Status::Pending)?,
    })
}

/// Closing line for text output. Progress lines are printed during the run.
pub(crate) fn format_outcome(report: &SyncReport) -> String {
    if !report.reachable {
        return format!(
            "Remote {} is unreachable; {} report(s) remain pending.",
            report.remote, report.pending
        );
    }
    if report.skipped {
        return format!(
            "Another sync is already running; {} report(s) pending.",
            report.pending
        );
    }
    if report.summary.selected == 0 {
        return "Nothing to sync.".to_string();
    }
    match report.pending {
        0 => "All reports synced.".to_string(),
        n => format!("{} report(s) still pending; run 'fr sync' again to retry.", n),
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
