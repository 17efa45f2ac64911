// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable local storage for reports.
//!
//! [`RecordStore`] is the contract the sync engine depends on; [`SqliteStore`]
//! is the SQLite-backed implementation used by the CLI. Every mutation is a
//! committed single-row write, so concurrent batch members never need more
//! locking than the store provides per call.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::report::{NewReport, Report, ReportId, ReportPayload, ReportUpdate, Status};

/// Durable mapping from report id to [`Report`].
pub trait RecordStore: Send + Sync {
    /// Persist a new report as `pending` and return its fresh id.
    fn insert(&self, report: NewReport) -> Result<ReportId>;

    /// All reports currently in `status`. Ordering is not part of the contract.
    fn list_by_status(&self, status: Status) -> Result<Vec<Report>>;

    /// Merge the given fields into report `id`.
    ///
    /// Fails with [`Error::ReportNotFound`] if the report does not exist. The
    /// write is committed before this returns.
    fn update(&self, id: ReportId, update: ReportUpdate) -> Result<()>;

    /// Snapshot of every report, newest first.
    fn list_all(&self) -> Result<Vec<Report>>;

    /// Fetch a single report.
    fn get(&self, id: ReportId) -> Result<Report>;

    /// Number of reports in `status`.
    fn count_by_status(&self, status: Status) -> Result<usize>;
}

/// SQL schema for the report store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    remote_id TEXT,
    name TEXT NOT NULL,
    location TEXT NOT NULL,
    category TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    has_attachment INTEGER NOT NULL DEFAULT 0,
    last_error TEXT,
    CHECK (status IN ('pending', 'synced')),
    CHECK (status = 'pending' OR remote_id IS NOT NULL)
);

CREATE INDEX IF NOT EXISTS idx_reports_status ON reports(status);
CREATE INDEX IF NOT EXISTS idx_reports_created ON reports(created_at);
"#;

const SELECT_COLUMNS: &str = "SELECT id, remote_id, name, location, category, description,
        created_at, status, has_attachment, last_error
 FROM reports";

/// Run schema creation and all migrations on a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    migrate_add_last_error(conn)?;
    Ok(())
}

/// Migration: add `last_error` to stores created before failures were recorded.
fn migrate_add_last_error(conn: &Connection) -> Result<()> {
    let has_column: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM pragma_table_info('reports') WHERE name = 'last_error'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);

    if !has_column {
        conn.execute("ALTER TABLE reports ADD COLUMN last_error TEXT", [])?;
    }
    Ok(())
}

/// Fixed-width timestamps so that text ordering matches time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn row_to_report(row: &Row<'_>) -> std::result::Result<Report, rusqlite::Error> {
    let category_str: String = row.get(4)?;
    let created_str: String = row.get(6)?;
    let status_str: String = row.get(7)?;

    Ok(Report {
        id: row.get(0)?,
        remote_id: row.get(1)?,
        payload: ReportPayload {
            name: row.get(2)?,
            location: row.get(3)?,
            category: parse_db(&category_str, "category")?,
            description: row.get(5)?,
        },
        created_at: parse_timestamp(&created_str, "created_at")?,
        status: parse_db(&status_str, "status")?,
        has_attachment: row.get(8)?,
        last_error: row.get(9)?,
    })
}

/// SQLite-backed [`RecordStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // FULL sync: a committed update must survive a crash right after it.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;

        run_migrations(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Insert `report` already marked synced, in one transaction.
    ///
    /// `remote_id` maps the freshly assigned local id to the synced id. If the
    /// mapping yields an empty id nothing is stored.
    pub fn insert_synced(
        &self,
        report: NewReport,
        remote_id: impl FnOnce(ReportId) -> String,
    ) -> Result<(ReportId, String)> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let id = insert_row(&tx, &report)?;
        let remote_id = remote_id(id);
        if remote_id.trim().is_empty() {
            return Err(Error::MissingRemoteId(id));
        }
        tx.execute(
            "UPDATE reports SET status = ?1, remote_id = ?2 WHERE id = ?3",
            params![Status::Synced.as_str(), remote_id, id],
        )?;
        tx.commit()?;
        tracing::debug!(id, remote_id = %remote_id, "synced report inserted");
        Ok((id, remote_id))
    }

    fn query_reports(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Report>> {
        let mut stmt = conn.prepare(sql)?;
        let reports = stmt
            .query_map(params, row_to_report)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reports)
    }
}

/// Insert a pending row and return its id.
fn insert_row(conn: &Connection, report: &NewReport) -> Result<ReportId> {
    conn.execute(
        "INSERT INTO reports (name, location, category, description, created_at,
         status, has_attachment)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            report.payload.name,
            report.payload.location,
            report.payload.category.as_str(),
            report.payload.description,
            format_timestamp(&report.created_at),
            Status::Pending.as_str(),
            report.has_attachment,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl RecordStore for SqliteStore {
    fn insert(&self, report: NewReport) -> Result<ReportId> {
        let conn = self.lock()?;
        let id = insert_row(&conn, &report)?;
        tracing::debug!(id, "report inserted");
        Ok(id)
    }

    fn list_by_status(&self, status: Status) -> Result<Vec<Report>> {
        let conn = self.lock()?;
        let sql = format!("{SELECT_COLUMNS} WHERE status = ?1 ORDER BY id");
        Self::query_reports(&conn, &sql, params![status.as_str()])
    }

    fn update(&self, id: ReportId, update: ReportUpdate) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let current: Option<(String, Option<String>, Option<String>)> = tx
            .query_row(
                "SELECT status, remote_id, last_error FROM reports WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let (status_str, remote_id, last_error) = current.ok_or(Error::ReportNotFound(id))?;

        let current_status: Status = status_str
            .parse()
            .map_err(|_| Error::CorruptedData(format!("invalid status '{status_str}'")))?;
        let next_status = update.status.unwrap_or(current_status);
        if !current_status.can_transition_to(next_status) {
            return Err(Error::InvalidTransition {
                id,
                from: current_status.to_string(),
                to: next_status.to_string(),
            });
        }

        if current_status == Status::Synced {
            if let (Some(current), Some(requested)) = (&remote_id, &update.remote_id) {
                if current != requested {
                    return Err(Error::RemoteIdChanged {
                        id,
                        from: current.clone(),
                        to: requested.clone(),
                    });
                }
            }
        }

        let next_remote_id = update.remote_id.or(remote_id);
        if next_status == Status::Synced && next_remote_id.is_none() {
            return Err(Error::MissingRemoteId(id));
        }
        let next_last_error = update.last_error.unwrap_or(last_error);

        tx.execute(
            "UPDATE reports SET status = ?1, remote_id = ?2, last_error = ?3 WHERE id = ?4",
            params![next_status.as_str(), next_remote_id, next_last_error, id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Report>> {
        let conn = self.lock()?;
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC");
        Self::query_reports(&conn, &sql, [])
    }

    fn get(&self, id: ReportId) -> Result<Report> {
        let conn = self.lock()?;
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let report = conn
            .query_row(&sql, params![id], row_to_report)
            .optional()?;
        report.ok_or(Error::ReportNotFound(id))
    }

    fn count_by_status(&self, status: Status) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reports WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
