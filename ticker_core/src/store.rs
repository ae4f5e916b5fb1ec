//! Generic snapshot container with a single-writer discipline and a one-shot event queue.
//!
//! A `Store<S, E>` holds the latest snapshot `S` behind an `Arc`. Readers clone the
//! `Arc` and never observe a half-written value; writers are serialized by a
//! separate writer lock, compute the next snapshot from the current one, and
//! only take the read/write lock for the pointer swap. Every published snapshot
//! is forwarded to all subscribers while the writer lock is still held, so each
//! subscriber receives snapshots in publication order.
//!
//! Events `E` go through a bounded queue with a single consumer. When the queue
//! is full the oldest pending event is dropped to make room; events emitted
//! while nobody listens are dropped as well, so a late consumer never sees a
//! replay.
//!
//! Once closed, a store rejects every further update.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};
use log::{debug, warn};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

struct Writer<S> {
    subscribers: Vec<Sender<Arc<S>>>,
    closed: bool,
}

/// Latest-snapshot container plus a one-shot event queue.
pub struct Store<S, E> {
    current: RwLock<Arc<S>>,
    writer: Mutex<Writer<S>>,
    events: EventQueue<E>,
}

impl<S, E> Store<S, E> {
    /// Creates a store holding `initial`, with room for `event_capacity` pending events.
    pub fn new(initial: S, event_capacity: usize) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            writer: Mutex::new(Writer {
                subscribers: Vec::new(),
                closed: false,
            }),
            events: EventQueue::new(event_capacity),
        }
    }

    /// The latest published snapshot.
    pub fn current(&self) -> Arc<S> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the snapshot with `f(current)`.
    ///
    /// Returns `false` without calling `f` if the store is closed.
    pub fn update(&self, f: impl FnOnce(&S) -> S) -> bool {
        self.update_if(|| true, f)
    }

    /// Replaces the snapshot with `f(current)` if `guard` still holds.
    ///
    /// `guard` is evaluated under the writer lock, so no other update can slip in
    /// between the check and the publication.
    pub fn update_if(&self, guard: impl FnOnce() -> bool, f: impl FnOnce(&S) -> S) -> bool {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if writer.closed || !guard() {
            return false;
        }
        let next = Arc::new(f(&self.current()));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);
        writer
            .subscribers
            .retain(|tx| tx.send(Arc::clone(&next)).is_ok());
        true
    }

    /// Subscribes to snapshots. The current snapshot is delivered first.
    ///
    /// The returned channel is disconnected when the store is closed.
    pub fn subscribe(&self) -> Receiver<Arc<S>> {
        let (tx, rx) = unbounded();
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if !writer.closed && tx.send(self.current()).is_ok() {
            writer.subscribers.push(tx);
        }
        rx
    }

    /// Queues a one-shot event for the current consumer, if any.
    pub fn emit(&self, event: E) {
        if self.is_closed() {
            debug!("Store closed, event dropped");
            return;
        }
        self.events.push(event);
    }

    /// Takes over the event stream. A previous consumer's channel is disconnected.
    pub fn events(&self) -> Receiver<E> {
        self.events.subscribe()
    }

    /// Rejects all further updates and disconnects every subscriber.
    pub fn close(&self) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.closed = true;
        writer.subscribers.clear();
        self.events.close();
    }

    pub fn is_closed(&self) -> bool {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }
}

/// Bounded single-consumer queue that drops the oldest event when full.
struct EventQueue<E> {
    capacity: usize,
    slot: Mutex<Option<(Sender<E>, Receiver<E>)>>,
}

impl<E> EventQueue<E> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slot: Mutex::new(None),
        }
    }

    fn subscribe(&self) -> Receiver<E> {
        let (tx, rx) = bounded(self.capacity);
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some((tx, rx.clone()));
        rx
    }

    fn push(&self, event: E) {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let Some((tx, rx)) = slot.as_ref() else {
            debug!("No event consumer, event dropped");
            return;
        };
        if let Err(TrySendError::Full(event)) = tx.try_send(event) {
            warn!("Event queue full ({} pending), dropping the oldest", self.capacity);
            let _ = rx.try_recv();
            let _ = tx.try_send(event);
        }
    }

    fn close(&self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
