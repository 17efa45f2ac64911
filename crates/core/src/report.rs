// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core report types.
//!
//! A [`Report`] is one incident report created offline. Its payload and
//! creation time never change; only the sync fields (`status`, `remote_id`,
//! `last_error`) are mutated, and only through a [`ReportUpdate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Locally-assigned report identifier.
pub type ReportId = i64;

/// Classification of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Immediate danger to life or property.
    Emergency,
    /// Food shortage or distribution.
    Food,
    /// Injury, illness, or medical supply need.
    Medical,
    /// Housing or shelter need.
    Shelter,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Emergency,
        Category::Food,
        Category::Medical,
        Category::Shelter,
    ];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Emergency => "emergency",
            Category::Food => "food",
            Category::Medical => "medical",
            Category::Shelter => "shelter",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "emergency" => Ok(Category::Emergency),
            "food" => Ok(Category::Food),
            "medical" => Ok(Category::Medical),
            "shelter" => Ok(Category::Shelter),
            _ => Err(Error::InvalidCategory(s.to_string())),
        }
    }
}

/// Sync status of a report.
///
/// The only legal transition is `Pending -> Synced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not yet confirmed by the server. Initial state.
    Pending,
    /// Acknowledged by the server, which assigned a remote id. Terminal.
    Synced,
}

impl Status {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Synced => "synced",
        }
    }

    /// Check if a transition from this status to `target` is allowed.
    ///
    /// Staying in place is allowed; leaving `Synced` is not.
    pub fn can_transition_to(&self, target: Status) -> bool {
        !matches!((self, target), (Status::Synced, Status::Pending))
    }

    /// Returns true for the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Synced)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "synced" => Ok(Status::Synced),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// Business fields of a report, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    /// Name of the person filing the report.
    pub name: String,
    /// GPS coordinates or a landmark.
    pub location: String,
    pub category: Category,
    /// Free-text description of the situation.
    pub description: String,
}

impl ReportPayload {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        ReportPayload {
            name: name.into(),
            location: location.into(),
            category,
            description: description.into(),
        }
    }

    /// Reject payloads with blank required fields.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("name", &self.name),
            ("location", &self.location),
            ("description", &self.description),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::FieldEmpty { field });
            }
        }
        Ok(())
    }
}

/// A report that has not been persisted yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub payload: ReportPayload,
    pub has_attachment: bool,
    pub created_at: DateTime<Utc>,
}

impl NewReport {
    /// Create a new report stamped with the current time.
    pub fn new(payload: ReportPayload, has_attachment: bool) -> Self {
        Self::with_created_at(payload, has_attachment, Utc::now())
    }

    /// Create a new report with an explicit creation time.
    pub fn with_created_at(
        payload: ReportPayload,
        has_attachment: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        NewReport {
            payload,
            has_attachment,
            created_at,
        }
    }
}

/// A persisted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    /// Identifier assigned by the server; present iff `status == Synced`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    #[serde(flatten)]
    pub payload: ReportPayload,
    pub created_at: DateTime<Utc>,
    pub status: Status,
    /// Attachment-bearing reports are slower to send and sync last.
    pub has_attachment: bool,
    /// Message from the most recent failed sync attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl Report {
    /// Sort key for sync ordering: text-only before attachments, then oldest
    /// first. The id breaks ties between reports created in the same instant.
    pub fn priority_key(&self) -> (bool, DateTime<Utc>, ReportId) {
        (self.has_attachment, self.created_at, self.id)
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }
}

/// A partial update to a report's sync fields.
///
/// `None` leaves a field untouched. For `last_error`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportUpdate {
    pub remote_id: Option<String>,
    pub status: Option<Status>,
    pub last_error: Option<Option<String>>,
}

impl ReportUpdate {
    /// Record a server acknowledgment.
    pub fn synced(remote_id: impl Into<String>) -> Self {
        ReportUpdate {
            remote_id: Some(remote_id.into()),
            status: Some(Status::Synced),
            last_error: Some(None),
        }
    }

    /// Record a failed attempt; the status is left as it is.
    pub fn failed(message: impl Into<String>) -> Self {
        ReportUpdate {
            last_error: Some(Some(message.into())),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.remote_id.is_none() && self.status.is_none() && self.last_error.is_none()
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
