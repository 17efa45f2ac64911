// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking and sync-on-reconnect.
//!
//! The engine never asks whether the network is up. Instead the host feeds a
//! [`ConnectivityMonitor`] (from a [`ReachabilityProbe`] or any other signal),
//! and [`spawn_auto_sync`] starts one sync run each time the state goes from
//! offline to online.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::http::Uri;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::SyncEngine;
use crate::error::{Error, Result};
use crate::progress::ProgressSink;
use crate::store::RecordStore;
use crate::submitter::RemoteSubmitter;

/// Default time allowed for a reachability probe to connect.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Whether the remote is currently reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        *self == Connectivity::Online
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Online => write!(f, "online"),
            Connectivity::Offline => write!(f, "offline"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    state: Connectivity,
    /// Number of offline→online transitions so far.
    reconnects: u64,
}

/// Holds the current connectivity state and notifies subscribers.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<Snapshot>,
}

impl ConnectivityMonitor {
    pub fn new(initial: Connectivity) -> Self {
        let (tx, _rx) = watch::channel(Snapshot {
            state: initial,
            reconnects: 0,
        });
        ConnectivityMonitor { tx }
    }

    pub fn current(&self) -> Connectivity {
        self.tx.borrow().state
    }

    pub fn is_online(&self) -> bool {
        self.current().is_online()
    }

    /// Record a new state. Returns true only for an offline→online transition.
    ///
    /// Setting the state it already has is a no-op and wakes nobody.
    pub fn set(&self, state: Connectivity) -> bool {
        let mut came_online = false;
        self.tx.send_if_modified(|snapshot| {
            if snapshot.state == state {
                return false;
            }
            came_online = state.is_online();
            if came_online {
                snapshot.reconnects += 1;
            }
            snapshot.state = state;
            true
        });
        came_online
    }

    /// Watch for transitions made after this call.
    pub fn subscribe(&self) -> ConnectivityWatcher {
        let rx = self.tx.subscribe();
        let seen = rx.borrow().reconnects;
        ConnectivityWatcher { rx, seen }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(Connectivity::Offline)
    }
}

/// Receiving side of a [`ConnectivityMonitor`].
#[derive(Debug)]
pub struct ConnectivityWatcher {
    rx: watch::Receiver<Snapshot>,
    seen: u64,
}

impl ConnectivityWatcher {
    pub fn current(&self) -> Connectivity {
        self.rx.borrow().state
    }

    /// Wait until the monitor has gone offline→online since the last call.
    ///
    /// Several transitions that happen before this is polled count as one.
    /// Returns false once the monitor is dropped.
    pub async fn came_online(&mut self) -> bool {
        loop {
            let reconnects = self.rx.borrow_and_update().reconnects;
            if reconnects > self.seen {
                self.seen = reconnects;
                return true;
            }
            if self.rx.changed().await.is_err() {
                return false;
            }
        }
    }

    /// Treat every transition made so far as handled.
    pub fn skip_pending(&mut self) {
        self.seen = self.rx.borrow_and_update().reconnects;
    }
}

/// Run `engine` once for every offline→online transition of `monitor`.
///
/// The task ends when `cancel` fires or the monitor is dropped, and yields the
/// number of runs it started. Transitions that arrive during a run are
/// dropped, not queued; the next reconnect after the run triggers again.
pub fn spawn_auto_sync<S, R>(
    engine: Arc<SyncEngine<S, R>>,
    monitor: &ConnectivityMonitor,
    progress: Option<Arc<dyn ProgressSink>>,
    cancel: CancellationToken,
) -> JoinHandle<usize>
where
    S: RecordStore + 'static,
    R: RemoteSubmitter + 'static,
{
    let mut watcher = monitor.subscribe();
    tokio::spawn(async move {
        let mut runs = 0;
        loop {
            let came_online = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                came_online = watcher.came_online() => came_online,
            };
            if !came_online {
                break;
            }
            info!("connection restored, starting sync");
            runs += 1;
            let summary = engine.run_sync(progress.as_deref()).await;
            watcher.skip_pending();
            debug!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "auto sync finished"
            );
        }
        runs
    })
}

pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// Answers "can the remote be reached right now?".
pub trait ReachabilityProbe: Send + Sync {
    fn check(&self) -> ProbeFuture<'_>;
}

/// Probes reachability with a plain TCP connect to the remote's host and port.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Probe `addr` (`host:port`).
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        TcpProbe {
            addr: addr.into(),
            timeout,
        }
    }

    /// Probe the host and port of a `ws://` or `wss://` URL.
    ///
    /// The port defaults to 80 for `ws` and 443 for `wss`.
    pub fn from_url(url: &str, timeout: Duration) -> Result<Self> {
        let uri: Uri = url
            .parse()
            .map_err(|_| Error::InvalidUrl(url.to_string()))?;
        let default_port = match uri.scheme_str() {
            Some("ws") => 80,
            Some("wss") => 443,
            _ => return Err(Error::InvalidUrl(url.to_string())),
        };
        let host = uri
            .host()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
        let port = uri.port_u16().unwrap_or(default_port);
        Ok(Self::new(format!("{}:{}", host, port), timeout))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl ReachabilityProbe for TcpProbe {
    fn check(&self) -> ProbeFuture<'_> {
        Box::pin(async move {
            matches!(
                tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await,
                Ok(Ok(_))
            )
        })
    }
}

/// Probe every `interval` and feed the result into `monitor` until cancelled.
///
/// The first probe runs immediately.
pub async fn poll_reachability(
    probe: &dyn ReachabilityProbe,
    monitor: &ConnectivityMonitor,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let reachable = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            reachable = probe.check() => reachable,
        };

        let state = Connectivity::from_reachable(reachable);
        let previous = monitor.current();
        if monitor.set(state) {
            info!("remote is reachable");
        } else if previous != state {
            info!("remote is unreachable, working offline");
        }
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
