// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fr_core::{RecordStore, Report, Status};

use super::open_store;
use crate::cli::OutputFormat;
use crate::error::Result;

pub fn run(status: Option<Status>, output: OutputFormat) -> Result<()> {
    let (store, _, _) = open_store()?;
    let reports = list_impl(&*store, status)?;

    match output {
        OutputFormat::Text => {
            print!("{}", render_text(&reports, status));
        }
        OutputFormat::Id => {
            for report in &reports {
                println!("{}", report.id);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }
    Ok(())
}

/// All reports, newest first, optionally limited to one status.
pub(crate) fn list_impl(store: &dyn RecordStore, status: Option<Status>) -> Result<Vec<Report>> {
    let mut reports = store.list_all()?;
    if let Some(status) = status {
        reports.retain(|r| r.status == status);
    }
    Ok(reports)
}

pub(crate) fn format_report_line(report: &Report) -> String {
    let mut line = format!(
        "#{} {} [{}] {} @ {}: {}",
        report.id,
        report.created_at.format("%Y-%m-%d %H:%M"),
        report.payload.category,
        report.payload.name,
        report.payload.location,
        report.payload.description,
    );
    if report.has_attachment {
        line.push_str(" (attachment)");
    }
    if let Some(remote_id) = &report.remote_id {
        line.push_str(&format!(" -> {}", remote_id));
    }
    line
}

/// Pending and synced sections; a status filter shows only its section.
pub(crate) fn render_text(reports: &[Report], status: Option<Status>) -> String {
    if reports.is_empty() {
        return match status {
            Some(status) => format!("No {} reports.\n", status),
            None => "No reports.\n".to_string(),
        };
    }

    let mut out = String::new();
    for section in [Status::Pending, Status::Synced] {
        if status.is_some_and(|s| s != section) {
            continue;
        }
        let rows: Vec<&Report> = reports.iter().filter(|r| r.status == section).collect();
        if rows.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let title = match section {
            Status::Pending => "Pending",
            Status::Synced => "Synced",
        };
        out.push_str(&format!("{} ({}):\n", title, rows.len()));
        for report in rows {
            out.push_str(&format!("  {}\n", format_report_line(report)));
            if let Some(error) = &report.last_error {
                out.push_str(&format!("      last error: {}\n", error));
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
