// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote submission of reports.
//!
//! Provides a trait-based submitter that enables:
//! - Real WebSocket submission for production
//! - Mock submitters for unit testing
//!
//! The remote's failure modes are indistinguishable to the client, so every
//! [`SubmitError`] is retryable. A submitter never touches the local store.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use crate::protocol::{ClientMessage, ServerMessage, WireReport};
use crate::report::Report;

/// Default per-submit timeout.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for submit operations. Every variant is transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed before the server answered.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// No answer within the submit timeout.
    #[error("submit timed out after {0:?}")]
    Timeout(Duration),

    /// The server refused the report.
    #[error("{0}")]
    Rejected(String),

    /// Malformed message in either direction.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SubmitError {
    /// Always true; kept as a method so call sites read as a policy check.
    pub fn is_retryable(&self) -> bool {
        true
    }
}

/// Result type for submit operations.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Boxed future returned by [`RemoteSubmitter::submit`].
pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = SubmitResult<String>> + Send + 'a>>;

/// Submits one report and resolves to the server-assigned id.
pub trait RemoteSubmitter: Send + Sync {
    /// Submit `report`. Implementations carry their own timeout.
    fn submit<'a>(&'a self, report: &'a Report) -> SubmitFuture<'a>;
}

/// WebSocket submitter using tokio-tungstenite.
///
/// Each submit opens its own connection, so a batch of N reports holds at most
/// N connections at once.
pub struct WebSocketSubmitter {
    url: String,
    timeout: Duration,
    next_request_id: AtomicU64,
}

impl WebSocketSubmitter {
    /// Create a submitter for the server at `url` (`ws://` or `wss://`).
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_SUBMIT_TIMEOUT)
    }

    /// Create a submitter with a custom per-submit timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        WebSocketSubmitter {
            url: url.into(),
            timeout,
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn exchange(&self, request_id: u64, msg: ClientMessage) -> SubmitResult<String> {
        let (ws, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| SubmitError::ConnectionFailed(e.to_string()))?;
        let (mut sink, mut stream) = ws.split();

        let json = msg
            .to_json()
            .map_err(|e| SubmitError::Protocol(e.to_string()))?;
        sink.send(Message::Text(json.into()))
            .await
            .map_err(|e| SubmitError::SendFailed(e.to_string()))?;

        let outcome = loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    let reply = match ServerMessage::from_json(&text) {
                        Ok(reply) => reply,
                        Err(e) => break Err(SubmitError::Protocol(e.to_string())),
                    };
                    match reply {
                        ServerMessage::Accepted {
                            request_id: id,
                            remote_id,
                        } if id == request_id => break Ok(remote_id),
                        ServerMessage::Rejected {
                            request_id: id,
                            message,
                        } if id == request_id => break Err(SubmitError::Rejected(message)),
                        ServerMessage::Error { message } => {
                            break Err(SubmitError::Rejected(message))
                        }
                        // Replies to other requests or pongs
                        _ => continue,
                    }
                }
                Some(Ok(Message::Close(_))) | None => break Err(SubmitError::ConnectionClosed),
                Some(Ok(_)) => continue,
                Some(Err(e)) => break Err(SubmitError::ReceiveFailed(e.to_string())),
            }
        };

        let _ = sink.close().await;
        outcome
    }
}

impl RemoteSubmitter for WebSocketSubmitter {
    fn submit<'a>(&'a self, report: &'a Report) -> SubmitFuture<'a> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let msg = ClientMessage::submit(request_id, WireReport::from(report));
        Box::pin(async move {
            match tokio::time::timeout(self.timeout, self.exchange(request_id, msg)).await {
                Ok(result) => result,
                Err(_) => Err(SubmitError::Timeout(self.timeout)),
            }
        })
    }
}

#[cfg(test)]
#[path = "submitter_tests.rs"]
mod tests;
