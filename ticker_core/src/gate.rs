//! Connectivity-driven start/stop of the poll loop.
//!
//! The gate consumes a monitor's status sequence on its own thread for the whole
//! lifetime of a controller. Repeated statuses are suppressed: only a status that
//! differs from the previously reported one is acted upon.
//!
//! - `Available` starts polling (a no-op if a cycle is already live).
//! - `Unavailable` / `Lost` stop polling and publish a `Network` error, keeping the
//!   last fetched tickers visible.
//! - `Losing` is informational and changes nothing.

use crate::cancel::CancellationToken;
use crate::poll_loop::PollLoop;
use crate::state::{ErrorKind, TickerStore};
use crossbeam_channel::{Receiver, select};
use log::{debug, error, info};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use ticker_common::{ConnectivityStatus, Result};

/// What the gate does in response to a reported status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    StartPolling,
    StopPolling,
    Ignore,
}

impl From<ConnectivityStatus> for GateAction {
    fn from(status: ConnectivityStatus) -> Self {
        match status {
            ConnectivityStatus::Available => Self::StartPolling,
            s if s.is_offline() => Self::StopPolling,
            _ => Self::Ignore,
        }
    }
}

/// Suppresses consecutive duplicate statuses.
#[derive(Debug, Default)]
pub struct DistinctStatus {
    last: Option<ConnectivityStatus>,
}

impl DistinctStatus {
    /// Returns the status if it differs from the previously reported one.
    pub fn observe(&mut self, status: ConnectivityStatus) -> Option<ConnectivityStatus> {
        if self.last == Some(status) {
            return None;
        }
        self.last = Some(status);
        Some(status)
    }
}

/// Background subscription to a connectivity monitor.
pub struct ConnectivityGate {
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ConnectivityGate {
    /// Spawns the gate thread consuming `statuses`.
    pub fn spawn(
        statuses: Receiver<ConnectivityStatus>,
        poll_loop: Arc<PollLoop>,
        store: Arc<TickerStore>,
    ) -> Result<Self> {
        let shutdown = CancellationToken::new();
        let cancelled = shutdown.cancelled();
        let handle = thread::Builder::new()
            .name("connectivity-gate".into())
            .spawn(move || run(statuses, cancelled, &poll_loop, &store))?;
        Ok(Self {
            shutdown,
            handle: Some(handle),
        })
    }

    /// Stops consuming statuses and waits for the gate thread. Idempotent.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Connectivity gate thread panicked");
            }
        }
    }
}

impl Drop for ConnectivityGate {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(
    statuses: Receiver<ConnectivityStatus>,
    cancelled: Receiver<()>,
    poll_loop: &PollLoop,
    store: &TickerStore,
) {
    let mut distinct = DistinctStatus::default();
    loop {
        select! {
            recv(cancelled) -> _ => break,
            recv(statuses) -> msg => match msg {
                Ok(status) => {
                    if let Some(status) = distinct.observe(status) {
                        apply(status, poll_loop, store);
                    } else {
                        debug!("Connectivity still {}", status);
                    }
                }
                Err(_) => {
                    info!("Connectivity monitor ended");
                    break;
                }
            }
        }
    }
    debug!("Connectivity gate stopped");
}

/// Performs the action mapped to `status`.
pub fn apply(status: ConnectivityStatus, poll_loop: &PollLoop, store: &TickerStore) {
    info!("Connectivity changed: {}", status);
    match GateAction::from(status) {
        GateAction::StartPolling => {
            if let Err(e) = poll_loop.start() {
                error!("Failed to start polling: {}", e);
            }
        }
        GateAction::StopPolling => {
            poll_loop.stop();
            store.update(|s| s.with_error(ErrorKind::Network));
        }
        GateAction::Ignore => {}
    }
}
