//!
//! Common types and utilities shared by the ticker controller and its client.
//!
//! This crate aggregates:
//! - `error`: workspace error type `TickerError` and the source failure `FetchError`.
//! - `result`: handy `Result<T, TickerError>` alias.
//! - `tickers`: raw and view ticker values, icon handles and sort options.
//! - `connectivity`: network status values reported by a connectivity monitor.
//! - `net`: endpoint constants and small helpers.
#![warn(missing_docs)]
pub mod connectivity;
pub mod error;
pub mod net;
pub mod result;
pub mod tickers;

pub use connectivity::ConnectivityStatus;
pub use error::{FetchError, TickerError};
pub use result::Result;
pub use tickers::{Icon, RawTicker, SortOption, ViewTicker};
