//! TCP reachability monitor.
//!
//! A background thread tries to open a TCP connection to the API host on a fixed
//! interval and reports the outcome as a `ConnectivityStatus`:
//!
//! - a successful probe reports `Available`;
//! - the first failed probe after a success reports `Losing`, and `lost_after`
//!   consecutive failures report `Lost`;
//! - failures before the host was ever reached report `Unavailable`.
//!
//! Every probe result is sent, repeated or not; consumers suppress duplicates.
//! The thread exits when the receiving side is dropped or the shutdown token is
//! cancelled.

use crossbeam_channel::{Receiver, unbounded};
use log::{debug, error, info};
use std::net::{TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;
use ticker_common::ConnectivityStatus;
use ticker_common::net::addr;
use ticker_core::{CancellationToken, ConnectivityMonitor};

/// Turns a sequence of probe outcomes into connectivity statuses.
#[derive(Debug)]
pub struct ProbeTracker {
    lost_after: u32,
    ever_reached: bool,
    failures: u32,
}

impl ProbeTracker {
    pub fn new(lost_after: u32) -> Self {
        Self {
            lost_after: lost_after.max(1),
            ever_reached: false,
            failures: 0,
        }
    }

    /// Records one probe outcome and returns the status it implies.
    pub fn record(&mut self, reachable: bool) -> ConnectivityStatus {
        if reachable {
            self.ever_reached = true;
            self.failures = 0;
            return ConnectivityStatus::Available;
        }

        self.failures = self.failures.saturating_add(1);
        if !self.ever_reached {
            ConnectivityStatus::Unavailable
        } else if self.failures >= self.lost_after {
            ConnectivityStatus::Lost
        } else {
            ConnectivityStatus::Losing
        }
    }
}

/// Connectivity monitor probing `host:port` over TCP.
pub struct ProbeMonitor {
    target: String,
    interval: Duration,
    timeout: Duration,
    lost_after: u32,
    shutdown: CancellationToken,
}

impl ProbeMonitor {
    pub fn new(
        host: &str,
        port: u16,
        interval: Duration,
        lost_after: u32,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            target: addr(host, port),
            interval,
            timeout: interval.clamp(Duration::from_millis(100), Duration::from_secs(5)),
            lost_after,
            shutdown,
        }
    }

    /// Returns `true` if any resolved address of the target accepts a connection.
    fn probe(&self) -> bool {
        let addrs = match self.target.to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!("Probe {}: resolve failed: {}", self.target, e);
                return false;
            }
        };
        for socket_addr in addrs {
            match TcpStream::connect_timeout(&socket_addr, self.timeout) {
                Ok(_) => return true,
                Err(e) => debug!("Probe {}: {}", socket_addr, e),
            }
        }
        false
    }
}

impl ConnectivityMonitor for ProbeMonitor {
    fn into_statuses(self) -> Receiver<ConnectivityStatus> {
        let (tx, rx) = unbounded();
        let spawned = thread::Builder::new()
            .name("connectivity-probe".into())
            .spawn({
                let tx = tx.clone();
                move || {
                    info!("Connectivity probe started. Target: {}", self.target);
                    let mut tracker = ProbeTracker::new(self.lost_after);
                    let mut last = None;
                    loop {
                        let status = tracker.record(self.probe());
                        if last != Some(status) {
                            info!("Probe {}: {}", self.target, status);
                            last = Some(status);
                        }
                        if tx.send(status).is_err() || !self.shutdown.sleep(self.interval) {
                            break;
                        }
                    }
                    info!("Connectivity probe stopping...");
                }
            });
        if let Err(e) = spawned {
            error!("Failed to spawn connectivity probe: {}", e);
            let _ = tx.send(ConnectivityStatus::Unavailable);
        }
        rx
    }
}

/// Monitor for sources that need no network: reports `Available` once.
pub fn always_available() -> Receiver<ConnectivityStatus> {
    let (tx, rx) = unbounded();
    let _ = tx.send(ConnectivityStatus::Available);
    rx
}
