// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Progress sinks for sync runs.

/// Receives human-readable status lines during a sync run.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ProgressSink for Silent {
    fn report(&self, _message: &str) {}
}

/// Forwards messages to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, message: &str) {
        tracing::info!(target: "fr_core::progress", "{}", message);
    }
}

pub(crate) fn starting(total: usize) -> String {
    format!("Starting sync of {} reports...", total)
}

pub(crate) fn batch_done(processed: usize, total: usize) -> String {
    format!("Progress: {}/{}", processed, total)
}

pub(crate) fn complete(succeeded: usize, failed: usize) -> String {
    format!("Sync complete: {} succeeded, {} failed.", succeeded, failed)
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
