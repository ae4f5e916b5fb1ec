//! Snapshot and event types published by the ticker controller.
//!
//! `TickersState` is immutable: every change produces a new value through one of
//! the transition methods below. Its fields are private so the visible list can
//! only ever be derived through [`filter_sort`], keeping it consistent with the
//! fetched list, the query and the sort option in every published snapshot.

use crate::pipeline::filter_sort;
use crate::store::Store;
use serde::Serialize;
use std::sync::Arc;
use strum_macros::Display;
use ticker_common::{SortOption, ViewTicker};

/// Store specialised for the ticker list.
pub type TickerStore = Store<TickersState, TickersEvent>;

/// Error shown alongside the (possibly stale) ticker list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display)]
pub enum ErrorKind {
    /// The last fetch succeeded.
    #[default]
    None,
    /// Connectivity or transport failure, including 4xx responses.
    Network,
    /// The remote source failed with a 5xx response.
    Server,
    /// Any failure that could not be classified.
    Unknown,
}

/// Coarse lifecycle position of a controller, derived from its latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum Phase {
    /// Constructed; no poll cycle has been started yet.
    Idle,
    /// A fetch is pending.
    Loading,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed or connectivity went away.
    Failed,
    /// The controller was torn down; nothing is published any more.
    Destroyed,
}

/// One-shot notifications that are not part of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum TickersEvent {
    /// The user selected a ticker in the list.
    TickerClicked(ViewTicker),
}

/// Immutable view state of the ticker list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickersState {
    raw_tickers: Arc<[ViewTicker]>,
    filtered_tickers: Arc<[ViewTicker]>,
    sort_option: SortOption,
    is_loading: bool,
    search_query: String,
    error: ErrorKind,
}

impl Default for TickersState {
    fn default() -> Self {
        Self {
            raw_tickers: Arc::from(Vec::new()),
            filtered_tickers: Arc::from(Vec::new()),
            sort_option: SortOption::default(),
            is_loading: true,
            search_query: String::new(),
            error: ErrorKind::None,
        }
    }
}

impl TickersState {
    /// Every ticker from the last successful fetch, in source order.
    pub fn raw_tickers(&self) -> &[ViewTicker] {
        &self.raw_tickers
    }

    /// The tickers matching the search query, in sort order.
    pub fn filtered_tickers(&self) -> &[ViewTicker] {
        &self.filtered_tickers
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort_option
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn error(&self) -> ErrorKind {
        self.error
    }

    /// Result of a successful fetch: new list, loading and error cleared.
    pub fn with_tickers(&self, tickers: Vec<ViewTicker>) -> Self {
        let filtered = filter_sort(&tickers, &self.search_query, self.sort_option);
        Self {
            raw_tickers: Arc::from(tickers),
            filtered_tickers: Arc::from(filtered),
            is_loading: false,
            error: ErrorKind::None,
            ..self.clone()
        }
    }

    /// Result of a failed fetch or a lost connection. The lists are kept.
    pub fn with_error(&self, error: ErrorKind) -> Self {
        Self {
            is_loading: false,
            error,
            ..self.clone()
        }
    }

    /// A fetch is about to start.
    pub fn loading(&self) -> Self {
        Self {
            is_loading: true,
            ..self.clone()
        }
    }

    pub fn with_search_query(&self, query: impl Into<String>) -> Self {
        let search_query = query.into();
        let filtered = filter_sort(&self.raw_tickers, &search_query, self.sort_option);
        Self {
            filtered_tickers: Arc::from(filtered),
            search_query,
            ..self.clone()
        }
    }

    pub fn with_sort_option(&self, sort_option: SortOption) -> Self {
        let filtered = filter_sort(&self.raw_tickers, &self.search_query, sort_option);
        Self {
            filtered_tickers: Arc::from(filtered),
            sort_option,
            ..self.clone()
        }
    }
}
