//! Error types shared between the controller and the client.
//!
//! `FetchError` describes why a ticker source could not deliver a list; the
//! controller never surfaces it to a presenter, it classifies it instead.
//! `TickerError` unifies the remaining failure cases for I/O, serialization,
//! channel communication and internal logic, allowing crates to propagate a
//! single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Transport-level failure reported by a ticker source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The remote source answered with a non-success HTTP status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The host name of the remote source could not be resolved.
    #[error("Address resolution failed: {0}")]
    Resolve(String),

    /// No route to the remote source exists.
    #[error("No route to host: {0}")]
    NoRoute(String),

    /// The request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be decoded into tickers.
    #[error("Malformed payload: {0}")]
    Payload(String),

    /// I/O error raised while talking to the source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Anything the source could not describe more precisely.
    #[error("{0}")]
    Other(String),
}

/// Unified error type shared by the controller and the client.
#[derive(Error, Debug)]
pub enum TickerError {
    /// I/O error originating from the standard library, sockets or thread spawning.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A ticker source failed outside the controller (e.g. a one-shot fetch).
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for TickerError {
    fn from(err: PoisonError<T>) -> Self {
        TickerError::MutexLock(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn fetch_error_converts_into_ticker_error() {
        let err: TickerError = FetchError::Status(503).into();
        assert_eq!(err.to_string(), "Fetch failed: HTTP status 503");
    }

    #[test]
    fn poisoned_lock_becomes_mutex_lock_error() {
        let lock = Arc::new(Mutex::new(0));
        let poisoner = Arc::clone(&lock);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err: TickerError = lock.lock().unwrap_err().into();
        assert!(matches!(err, TickerError::MutexLock(_)));
    }
}
