//! Collaborators the controller is built from.
//!
//! Both are injected at construction; the controller never creates its own.

use crate::cancel::CancellationToken;
use crossbeam_channel::Receiver;
use ticker_common::{ConnectivityStatus, FetchError, RawTicker};

/// Remote source of the latest quotes.
pub trait TickerSource: Send + Sync {
    /// Fetches every ticker, in the order the source delivers them.
    ///
    /// `cancel` is triggered when the caller no longer wants the result; a source
    /// may return early when it sees it, and whatever it returns afterwards is
    /// discarded anyway.
    fn fetch_all(&self, cancel: &CancellationToken) -> Result<Vec<RawTicker>, FetchError>;
}

/// Producer of connectivity updates.
///
/// Consumed by value: the sequence it yields can be started only once. The first
/// status reflects connectivity at the time of the call; the sequence ends when
/// the returned channel disconnects.
pub trait ConnectivityMonitor {
    fn into_statuses(self) -> Receiver<ConnectivityStatus>;
}

/// A plain channel is a monitor whose statuses are pushed by someone else.
impl ConnectivityMonitor for Receiver<ConnectivityStatus> {
    fn into_statuses(self) -> Receiver<ConnectivityStatus> {
        self
    }
}
