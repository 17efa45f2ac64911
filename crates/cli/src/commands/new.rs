// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::Arc;

use fr_core::{LogProgress, NewReport, ProgressSink, RecordStore, Report, SqliteStore};

use super::{build_engine, open_store, print_progress, remote_reachable, runtime};
use crate::cli::{OutputFormat, ReportArgs};
use crate::config::Config;
use crate::error::{Error, Result};

pub fn run(report: ReportArgs, no_sync: bool, output: OutputFormat) -> Result<()> {
    let (store, config, work_dir) = open_store()?;
    let saved = create_impl(&store, &report)?;

    match output {
        OutputFormat::Text => {
            println!("{}", format_created(&saved));
        }
        OutputFormat::Id => {
            println!("{}", saved.id);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
    }

    if !no_sync {
        try_sync(store, &config, &work_dir, output)?;
    }
    Ok(())
}

/// Validate and persist a new report. Fails if it could not be saved.
pub(crate) fn create_impl(store: &SqliteStore, args: &ReportArgs) -> Result<Report> {
    let payload = args.payload();
    payload.validate()?;

    let id = store
        .insert(NewReport::new(payload, args.attachment))
        .map_err(Error::SaveFailed)?;
    Ok(store.get(id)?)
}

pub(crate) fn format_created(report: &Report) -> String {
    let attachment = if report.has_attachment {
        " (with attachment)"
    } else {
        ""
    };
    format!(
        "Saved report #{} [{}] ({}){}",
        report.id, report.payload.category, report.status, attachment
    )
}

/// Sync right away if the remote answers; otherwise leave the report queued.
///
/// A failed sync is not an error here: the report is already saved.
fn try_sync(
    store: Arc<SqliteStore>,
    config: &Config,
    work_dir: &Path,
    output: OutputFormat,
) -> Result<()> {
    runtime()?.block_on(sync_now(store, config, work_dir, output == OutputFormat::Text))
}

async fn sync_now(
    store: Arc<SqliteStore>,
    config: &Config,
    work_dir: &Path,
    text: bool,
) -> Result<()> {
    if !remote_reachable(config).await? {
        tracing::info!(remote = %config.remote.url, "remote unreachable, report queued");
        if text {
            println!(
                "Offline: report queued until {} is reachable",
                config.remote.url
            );
        }
        return Ok(());
    }

    let engine = build_engine(store, config, work_dir);
    let sink: &dyn ProgressSink = if text { &print_progress } else { &LogProgress };
    engine.run_sync(Some(sink)).await;
    Ok(())
}

#[cfg(test)]
#[path = "new_tests.rs"]
mod tests;
