//! Offline ticker source producing synthetic prices.
//!
//! Every fetch moves each known pair by a small random walk around its last price,
//! so consecutive snapshots look like a live market without touching the network.
//! The daily change is measured against the price the simulation started from.

use crate::source::LISTINGS;
use log::debug;
use rand::Rng;
use std::sync::Mutex;
use std::time::Duration;
use ticker_common::{FetchError, RawTicker};
use ticker_core::{CancellationToken, TickerSource};

/// Price every simulated pair starts from.
const INITIAL_PRICE: f64 = 100.0;

struct Pair {
    symbol: &'static str,
    name: &'static str,
    open: f64,
    last: f64,
}

/// Random-walk ticker source for runs without network access.
pub struct SimulatedSource {
    pairs: Mutex<Vec<Pair>>,
    latency: Duration,
}

impl SimulatedSource {
    /// Creates a source covering every known listing, answering after `latency`.
    pub fn new(latency: Duration) -> Self {
        let pairs = LISTINGS
            .iter()
            .map(|l| Pair {
                symbol: l.symbol,
                name: l.name,
                open: INITIAL_PRICE,
                last: INITIAL_PRICE,
            })
            .collect();
        Self {
            pairs: Mutex::new(pairs),
            latency,
        }
    }

    /// Calculate the next synthetic price using a small random walk around `current_price`.
    ///
    /// The change is sampled uniformly from the range `[-1%, +1%]` and the result is
    /// clamped to a minimum positive value.
    pub fn next_price(current_price: f64) -> f64 {
        let mut rng = rand::rng();
        let change: f64 = rng.random_range(-0.01..0.01);
        let new_price = current_price * (1.0 + change);
        new_price.max(0.01)
    }
}

impl TickerSource for SimulatedSource {
    fn fetch_all(&self, cancel: &CancellationToken) -> Result<Vec<RawTicker>, FetchError> {
        if !cancel.sleep(self.latency) {
            return Err(FetchError::Other("Simulated fetch cancelled".into()));
        }

        let mut pairs = self
            .pairs
            .lock()
            .map_err(|e| FetchError::Other(e.to_string()))?;
        let tickers = pairs
            .iter_mut()
            .map(|pair| {
                pair.last = Self::next_price(pair.last);
                let change = (pair.last - pair.open) / pair.open;
                RawTicker::new(pair.symbol, pair.name, pair.last, change)
            })
            .collect::<Vec<_>>();
        debug!("Simulated {} tickers", tickers.len());
        Ok(tickers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_price_stays_within_one_percent() {
        for _ in 0..1000 {
            let next = SimulatedSource::next_price(100.0);
            assert!((98.99..=101.01).contains(&next), "{}", next);
        }
    }

    #[test]
    fn next_price_never_drops_below_a_cent() {
        assert_eq!(SimulatedSource::next_price(0.001), 0.01);
    }

    #[test]
    fn fetch_covers_every_listing_in_order() {
        let source = SimulatedSource::new(Duration::ZERO);
        let tickers = source.fetch_all(&CancellationToken::new()).unwrap();

        assert_eq!(tickers.len(), LISTINGS.len());
        assert_eq!(tickers[0].symbol, "BTC");
        assert_eq!(tickers[0].display_name, "Bitcoin");
        assert_eq!(tickers.last().unwrap().symbol, "FIL");
    }

    #[test]
    fn daily_change_follows_the_walk() {
        let source = SimulatedSource::new(Duration::ZERO);
        let token = CancellationToken::new();
        let mut last = Vec::new();
        for _ in 0..5 {
            last = source.fetch_all(&token).unwrap();
        }
        for ticker in &last {
            let expected = (ticker.last_price - INITIAL_PRICE) / INITIAL_PRICE;
            assert!((ticker.daily_change_percent - expected).abs() < 1e-12);
            assert!(ticker.daily_change_percent.abs() < 0.06);
        }
    }

    #[test]
    fn cancelled_fetch_returns_without_prices() {
        let source = SimulatedSource::new(Duration::from_secs(30));
        let token = CancellationToken::new();
        token.cancel();
        assert!(source.fetch_all(&token).is_err());
    }
}
