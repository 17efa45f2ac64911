// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for fr-core operations.

use thiserror::Error;

/// All possible errors that can occur in fr-core operations.
///
/// Remote submission failures are not part of this enum; they are
/// [`SubmitError`](crate::submitter::SubmitError) and are always retryable.
#[derive(Debug, Error)]
pub enum Error {
    #[error("report not found: {0}")]
    ReportNotFound(i64),

    #[error("invalid category: '{0}'\n  hint: valid categories are: emergency, food, medical, shelter")]
    InvalidCategory(String),

    #[error("invalid status: '{0}'\n  hint: valid statuses are: pending, synced")]
    InvalidStatus(String),

    #[error("invalid status transition for report {id}: cannot go from {from} to {to}")]
    InvalidTransition { id: i64, from: String, to: String },

    #[error("report {0} cannot be marked synced without a remote id")]
    MissingRemoteId(i64),

    #[error("report {id} is already synced as '{from}'; cannot change its remote id to '{to}'")]
    RemoteIdChanged { id: i64, from: String, to: String },

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid remote url '{0}'\n  hint: expected ws://host[:port] or wss://host[:port]")]
    InvalidUrl(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns true if the error means local storage is unavailable or a
    /// write did not complete.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::Io(_) | Error::LockPoisoned | Error::CorruptedData(_)
        )
    }
}

/// A specialized Result type for fr-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
