// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for engine, submitter, and connectivity tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use tokio::sync::Semaphore;

use crate::report::{Category, NewReport, Report, ReportId, ReportPayload, Status};
use crate::submitter::{RemoteSubmitter, SubmitError, SubmitFuture};

/// Create a pending report with the given id, attachment flag and creation second.
pub fn make_report(id: ReportId, has_attachment: bool, created_secs: i64) -> Report {
    Report {
        id,
        remote_id: None,
        payload: make_payload(&format!("reporter-{}", id)),
        created_at: Utc.timestamp_opt(created_secs, 0).unwrap(),
        status: Status::Pending,
        has_attachment,
        last_error: None,
    }
}

/// Create an unsaved report named `name`.
pub fn make_new_report(name: &str, has_attachment: bool, created_secs: i64) -> NewReport {
    NewReport::with_created_at(
        make_payload(name),
        has_attachment,
        Utc.timestamp_opt(created_secs, 0).unwrap(),
    )
}

fn make_payload(name: &str) -> ReportPayload {
    ReportPayload::new(name, "Central Market", Category::Emergency, "Road blocked")
}

/// Something the mock submitter observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitEvent {
    Started(ReportId),
    Finished(ReportId),
}

/// Scriptable submitter that records call order.
///
/// Reports succeed with `srv_<id>` unless their id is scripted to fail. When
/// gated, every submit waits for a permit released by [`MockSubmitter::release`].
pub struct MockSubmitter {
    failures: Mutex<HashMap<ReportId, usize>>,
    events: Mutex<Vec<SubmitEvent>>,
    gate: Option<Semaphore>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSubmitter {
    pub fn new() -> Self {
        MockSubmitter {
            failures: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
            gate: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// A submitter whose calls block until released.
    pub fn gated() -> Self {
        MockSubmitter {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Make the next `times` submits of report `id` fail.
    pub fn fail(self, id: ReportId, times: usize) -> Self {
        self.failures.lock().unwrap().insert(id, times);
        self
    }

    /// Let `n` blocked submits proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn events(&self) -> Vec<SubmitEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Report ids in the order their submits started.
    pub fn started(&self) -> Vec<ReportId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SubmitEvent::Started(id) => Some(id),
                SubmitEvent::Finished(_) => None,
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.started().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn should_fail(&self, id: ReportId) -> bool {
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(&id) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

impl RemoteSubmitter for MockSubmitter {
    fn submit<'a>(&'a self, report: &'a Report) -> SubmitFuture<'a> {
        Box::pin(async move {
            self.events
                .lock()
                .unwrap()
                .push(SubmitEvent::Started(report.id));
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            // Let sibling submits in the batch start before this one finishes.
            tokio::task::yield_now().await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.events
                .lock()
                .unwrap()
                .push(SubmitEvent::Finished(report.id));

            if self.should_fail(report.id) {
                Err(SubmitError::Rejected(format!(
                    "simulated failure for {}",
                    report.id
                )))
            } else {
                Ok(format!("srv_{}", report.id))
            }
        })
    }
}
