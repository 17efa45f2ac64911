// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for report submission.
//!
//! The protocol is request/response:
//! - Client sends a report and waits for the reply carrying the same `request_id`
//! - Server answers `accepted` with the id it assigned, or `rejected`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::{Category, Report, ReportId};

/// A report as it travels over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireReport {
    /// The client's local id, for server-side logging only.
    pub local_id: ReportId,
    pub name: String,
    pub location: String,
    pub category: Category,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub has_attachment: bool,
}

impl From<&Report> for WireReport {
    fn from(report: &Report) -> Self {
        WireReport {
            local_id: report.id,
            name: report.payload.name.clone(),
            location: report.payload.location.clone(),
            category: report.payload.category,
            description: report.payload.description.clone(),
            created_at: report.created_at,
            has_attachment: report.has_attachment,
        }
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Submit one report.
    Submit {
        /// Client-chosen id echoed in the reply.
        request_id: u64,
        report: WireReport,
    },

    /// Ping message for reachability checks.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The report was stored under `remote_id`.
    Accepted { request_id: u64, remote_id: String },

    /// The report was not stored. The client may retry.
    Rejected { request_id: u64, message: String },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error not tied to a request (e.g. unparseable message).
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Submit message.
    pub fn submit(request_id: u64, report: WireReport) -> Self {
        ClientMessage::Submit { request_id, report }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Accepted message.
    pub fn accepted(request_id: u64, remote_id: impl Into<String>) -> Self {
        ServerMessage::Accepted {
            request_id,
            remote_id: remote_id.into(),
        }
    }

    /// Creates a Rejected message.
    pub fn rejected(request_id: u64, message: impl Into<String>) -> Self {
        ServerMessage::Rejected {
            request_id,
            message: message.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// The request this message answers, if any.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ServerMessage::Accepted { request_id, .. }
            | ServerMessage::Rejected { request_id, .. } => Some(*request_id),
            ServerMessage::Pong { .. } | ServerMessage::Error { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
