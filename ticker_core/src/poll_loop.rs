//! Repeating fetch cycle with cooperative cancellation.
//!
//! A cycle runs on its own thread: fetch, publish, wait the poll interval, and
//! again, until it is cancelled or a fetch fails. A failure is classified,
//! published, and ends the cycle; nothing retries on its own.
//!
//! Concurrency:
//! - At most one cycle is live per `PollLoop`. `start` while a cycle is live is a no-op.
//! - Every cycle gets a fresh generation number. `start` and `stop` bump the shared
//!   counter; a cycle publishes only while the counter still equals its own
//!   generation, and the check runs inside the store's writer section. A fetch that
//!   returns after its cycle was stopped or replaced therefore never reaches the
//!   snapshot.
//! - `stop` does not wait for the cycle thread. A cycle blocked inside a slow fetch
//!   notices the cancellation when the fetch returns and exits without publishing.

use crate::cancel::CancellationToken;
use crate::classifier::classify;
use crate::source::TickerSource;
use crate::state::{ErrorKind, TickerStore, TickersState};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use ticker_common::{Result, ViewTicker};

struct ActiveCycle {
    generation: u64,
    token: CancellationToken,
}

impl ActiveCycle {
    fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }
}

/// Owner of the single repeating fetch cycle of a controller.
pub struct PollLoop {
    source: Arc<dyn TickerSource>,
    store: Arc<TickerStore>,
    interval: Duration,
    generation: Arc<AtomicU64>,
    cycles_started: AtomicU64,
    active: Mutex<Option<ActiveCycle>>,
}

impl PollLoop {
    pub fn new(source: Arc<dyn TickerSource>, store: Arc<TickerStore>, interval: Duration) -> Self {
        Self {
            source,
            store,
            interval,
            generation: Arc::new(AtomicU64::new(0)),
            cycles_started: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    /// Starts a cycle unless one is already live.
    ///
    /// Publishes `is_loading = true` before the first fetch. Returns `true` if a new
    /// cycle was started.
    pub fn start(&self) -> Result<bool> {
        let mut active = self.active.lock()?;
        self.start_locked(&mut active)
    }

    /// Cancels the live cycle, if any. Idempotent.
    ///
    /// Returns `true` if a live cycle was cancelled.
    pub fn stop(&self) -> bool {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        self.stop_locked(&mut active)
    }

    /// Cancels the live cycle and starts a fresh one, without letting another
    /// starter run in between.
    pub fn restart(&self) -> Result<()> {
        let mut active = self.active.lock()?;
        self.stop_locked(&mut active);
        self.start_locked(&mut active)?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(ActiveCycle::is_live)
    }

    /// The generation a cycle must carry for its results to be published.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Number of cycles started since construction.
    pub fn cycles_started(&self) -> u64 {
        self.cycles_started.load(Ordering::SeqCst)
    }

    fn start_locked(&self, active: &mut Option<ActiveCycle>) -> Result<bool> {
        if let Some(cycle) = active.as_ref().filter(|c| c.is_live()) {
            debug!("Poll cycle {} already running", cycle.generation);
            return Ok(false);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let cycle = Cycle {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            current: Arc::clone(&self.generation),
            generation,
            token: token.clone(),
            interval: self.interval,
        };
        if !cycle.publish(TickersState::loading) {
            debug!("Store closed, poll cycle {} not started", generation);
            return Ok(false);
        }

        let spawned = thread::Builder::new()
            .name(format!("poll-cycle-{generation}"))
            .spawn(move || cycle.run());
        if let Err(e) = spawned {
            error!("Failed to spawn poll cycle {}: {}", generation, e);
            self.store.update(|s| s.with_error(ErrorKind::Unknown));
            return Err(e.into());
        }

        self.cycles_started.fetch_add(1, Ordering::SeqCst);
        *active = Some(ActiveCycle { generation, token });
        info!("Poll cycle {} started", generation);
        Ok(true)
    }

    fn stop_locked(&self, active: &mut Option<ActiveCycle>) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let Some(cycle) = active.take() else {
            return false;
        };
        let was_live = cycle.is_live();
        cycle.token.cancel();
        if was_live {
            info!("Poll cycle {} stopped", cycle.generation);
        }
        was_live
    }
}

/// State moved onto a cycle thread.
struct Cycle {
    source: Arc<dyn TickerSource>,
    store: Arc<TickerStore>,
    current: Arc<AtomicU64>,
    generation: u64,
    token: CancellationToken,
    interval: Duration,
}

/// Marks the cycle as finished however its thread exits.
struct FinishOnDrop(CancellationToken);

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

impl Cycle {
    fn run(self) {
        let _finish = FinishOnDrop(self.token.clone());

        while !self.token.is_cancelled() {
            let result = self.source.fetch_all(&self.token);
            if self.token.is_cancelled() {
                debug!("Poll cycle {}: discarding result of a cancelled fetch", self.generation);
                break;
            }

            match result {
                Ok(raw) => {
                    let tickers: Vec<ViewTicker> = raw.into_iter().map(ViewTicker::from).collect();
                    debug!("Poll cycle {}: fetched {} tickers", self.generation, tickers.len());
                    if !self.publish(|s| s.with_tickers(tickers)) {
                        break;
                    }
                }
                Err(e) => {
                    let kind = classify(&e);
                    warn!("Poll cycle {}: fetch failed ({}), reporting {}", self.generation, e, kind);
                    self.token.cancel();
                    self.publish(|s| s.with_error(kind));
                    break;
                }
            }

            if !self.token.sleep(self.interval) {
                break;
            }
        }
        debug!("Poll cycle {} finished", self.generation);
    }

    /// Publishes `f(current)` if this cycle's generation is still the current one.
    fn publish(&self, f: impl FnOnce(&TickersState) -> TickersState) -> bool {
        let current = &self.current;
        let generation = self.generation;
        self.store
            .update_if(|| current.load(Ordering::SeqCst) == generation, f)
    }
}
