//! Ticker state controller.
//!
//! This crate keeps a live ticker list up to date and exposes it as immutable
//! snapshots. It wires together a few small building blocks:
//!
//! - `PollLoop`: fetches from a `TickerSource` on a fixed interval on its own
//!   thread, one cycle at a time, and stops on the first failure.
//! - `ConnectivityGate`: follows a `ConnectivityMonitor` and starts or stops the
//!   poll loop as the network comes and goes.
//! - `classify` and `filter_sort`: pure functions turning a failure into an
//!   `ErrorKind` and the fetched list into the visible one.
//! - `Store`: the latest snapshot plus a bounded one-shot event queue.
//! - `TickerStateController`: the composition a presenter talks to.
//!
//! Concurrency and shutdown:
//! - Cancellation is explicit: a `CancellationToken` reaches both the fetch call and
//!   the wait between fetches.
//! - Each poll cycle carries a generation number so that a result arriving after its
//!   cycle was stopped is dropped instead of published.
//! - Dropping the controller closes the store, joins the gate thread and cancels the
//!   running cycle; no snapshot is published afterwards.
pub mod cancel;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod gate;
pub mod pipeline;
pub mod poll_loop;
pub mod source;
pub mod state;
pub mod store;

pub use cancel::CancellationToken;
pub use classifier::classify;
pub use config::ControllerConfig;
pub use controller::TickerStateController;
pub use gate::ConnectivityGate;
pub use pipeline::filter_sort;
pub use poll_loop::PollLoop;
pub use source::{ConnectivityMonitor, TickerSource};
pub use state::{ErrorKind, Phase, TickerStore, TickersEvent, TickersState};
pub use store::Store;
