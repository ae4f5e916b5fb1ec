//! The unit a presenter attaches to.
//!
//! `TickerStateController` composes the snapshot store, the poll loop and the
//! connectivity gate. The gate subscription starts at construction and lives until
//! the controller is shut down or dropped; after that the controller is
//! `Destroyed` and publishes nothing more.

use crate::config::ControllerConfig;
use crate::gate::ConnectivityGate;
use crate::poll_loop::PollLoop;
use crate::source::{ConnectivityMonitor, TickerSource};
use crate::state::{ErrorKind, Phase, TickerStore, TickersEvent, TickersState};
use crossbeam_channel::Receiver;
use log::info;
use std::sync::Arc;
use ticker_common::{Result, SortOption, ViewTicker};

/// Owner of the polling lifecycle and of the published ticker list state.
pub struct TickerStateController {
    store: Arc<TickerStore>,
    poll_loop: Arc<PollLoop>,
    gate: ConnectivityGate,
}

impl TickerStateController {
    /// Builds a controller and subscribes it to `monitor`.
    ///
    /// Polling starts as soon as the monitor reports `Available`, or on `refresh`.
    pub fn new<M: ConnectivityMonitor>(
        source: Arc<dyn TickerSource>,
        monitor: M,
        config: ControllerConfig,
    ) -> Result<Self> {
        let store = Arc::new(TickerStore::new(
            TickersState::default(),
            config.event_capacity,
        ));
        let poll_loop = Arc::new(PollLoop::new(
            source,
            Arc::clone(&store),
            config.poll_interval,
        ));
        let gate = ConnectivityGate::spawn(
            monitor.into_statuses(),
            Arc::clone(&poll_loop),
            Arc::clone(&store),
        )?;
        Ok(Self {
            store,
            poll_loop,
            gate,
        })
    }

    /// Cancels the running cycle, if any, and starts a fresh one.
    ///
    /// `is_loading = true` is published before the first fetch of the new cycle.
    pub fn refresh(&self) -> Result<()> {
        info!("Refresh requested");
        self.poll_loop.restart()
    }

    /// Changes the search query and re-derives the visible list. Never fetches.
    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.store.update(|s| s.with_search_query(query));
    }

    /// Changes the sort option and re-derives the visible list. Never fetches.
    pub fn set_sort_option(&self, sort_option: SortOption) {
        self.store.update(|s| s.with_sort_option(sort_option));
    }

    /// Emits `TickerClicked`; the snapshot is left untouched.
    pub fn on_ticker_selected(&self, ticker: ViewTicker) {
        self.store.emit(TickersEvent::TickerClicked(ticker));
    }

    /// The latest snapshot. Callable from any thread.
    pub fn current_state(&self) -> Arc<TickersState> {
        self.store.current()
    }

    /// Every snapshot published from now on, starting with the current one.
    pub fn subscribe(&self) -> Receiver<Arc<TickersState>> {
        self.store.subscribe()
    }

    /// One-shot events. Only the most recent caller receives them.
    pub fn events(&self) -> Receiver<TickersEvent> {
        self.store.events()
    }

    pub fn phase(&self) -> Phase {
        if self.store.is_closed() {
            return Phase::Destroyed;
        }
        let state = self.store.current();
        if !state.is_loading() && state.error() != ErrorKind::None {
            Phase::Failed
        } else if self.poll_loop.cycles_started() == 0 {
            Phase::Idle
        } else if state.is_loading() {
            Phase::Loading
        } else {
            Phase::Ready
        }
    }

    /// Tears the controller down. Idempotent; also run on drop.
    pub fn shutdown(&mut self) {
        if self.store.is_closed() {
            return;
        }
        self.store.close();
        self.gate.shutdown();
        self.poll_loop.stop();
        info!("Ticker controller shut down");
    }
}

impl Drop for TickerStateController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
