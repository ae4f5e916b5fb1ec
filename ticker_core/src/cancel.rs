//! Cooperative cancellation shared between a poll cycle and whoever stops it.
//!
//! A `CancellationToken` is cloned into every suspension point of a cycle: the
//! fetch call receives it so a source may abort early, and the inter-poll delay
//! waits on it instead of sleeping blindly. Cancelling wakes every waiter at once
//! by dropping the only sender of an internal zero-capacity channel, so the
//! cancellation is observed both through `is_cancelled()` and through `select!`.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    signal: Mutex<Option<Sender<()>>>,
    waker: Receiver<()>,
}

/// Clonable handle signalling that a unit of work should stop.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// Creates a token that is not cancelled yet.
    pub fn new() -> Self {
        let (signal, waker) = bounded::<()>(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                signal: Mutex::new(Some(signal)),
                waker,
            }),
        }
    }

    /// Cancels the token. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner
            .signal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Whether `cancel` was called on this token or any of its clones.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// A receiver that becomes ready (disconnected) once the token is cancelled.
    ///
    /// Meant for `crossbeam_channel::select!`; no value is ever sent on it.
    pub fn cancelled(&self) -> Receiver<()> {
        self.inner.waker.clone()
    }

    /// Waits for `duration` unless cancelled first.
    ///
    /// Returns `true` if the full duration elapsed, `false` if the token was cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        match self.inner.waker.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => !self.is_cancelled(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn sleep_runs_to_completion_when_not_cancelled() {
        let token = CancellationToken::new();
        assert!(token.sleep(Duration::from_millis(10)));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_interrupts_a_long_sleep() {
        let token = CancellationToken::new();
        let sleeper = token.clone();
        let started = Instant::now();
        let handle = thread::spawn(move || sleeper.sleep(Duration::from_secs(30)));

        thread::sleep(Duration::from_millis(20));
        token.cancel();

        assert!(!handle.join().unwrap());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn cancelled_receiver_is_ready_after_cancel() {
        let token = CancellationToken::new();
        let cancelled = token.cancelled();
        assert!(cancelled.try_recv().is_err());

        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert!(!token.sleep(Duration::from_secs(30)));
        assert_eq!(
            cancelled.recv_timeout(Duration::from_secs(1)),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
