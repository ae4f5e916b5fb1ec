//! Console rendering of snapshots and events.
//!
//! Text mode writes one log line per visible ticker under a status header. JSON
//! mode prints one JSON object per snapshot or event on stdout, so the output can
//! be piped into other tools.
use chrono::Utc;
use log::info;
use serde::Serialize;
use ticker_common::{Result, ViewTicker};
use ticker_core::{ErrorKind, TickersEvent, TickersState};

/// A snapshot stamped with the time it was rendered.
#[derive(Serialize)]
struct Frame<'a> {
    timestamp: i64,
    #[serde(flatten)]
    state: &'a TickersState,
}

/// A one-shot event stamped with the time it was rendered.
#[derive(Serialize)]
struct EventFrame<'a> {
    timestamp: i64,
    event: &'static str,
    ticker: &'a ViewTicker,
}

/// Writes snapshots and events to the console.
pub struct ConsolePresenter {
    json: bool,
}

impl ConsolePresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn render(&self, state: &TickersState) -> Result<()> {
        if self.json {
            let frame = Frame {
                timestamp: Utc::now().timestamp_millis(),
                state,
            };
            println!("{}", serde_json::to_string(&frame)?);
        } else {
            for line in render_lines(state) {
                info!("{}", line);
            }
        }
        Ok(())
    }

    pub fn on_event(&self, event: &TickersEvent) -> Result<()> {
        match event {
            TickersEvent::TickerClicked(ticker) => {
                if self.json {
                    let frame = EventFrame {
                        timestamp: Utc::now().timestamp_millis(),
                        event: "ticker_clicked",
                        ticker,
                    };
                    println!("{}", serde_json::to_string(&frame)?);
                } else {
                    info!(
                        "SELECTED: {} ({}) Price={:.2} Change={:+.2}%",
                        ticker.display_name(),
                        ticker.symbol(),
                        ticker.last_price(),
                        ticker.daily_change_percent() * 100.0
                    );
                }
            }
        }
        Ok(())
    }
}

/// Header line followed by one line per visible ticker.
pub fn render_lines(state: &TickersState) -> Vec<String> {
    let mut header = format!(
        "[{}] {}/{} tickers | sort={}",
        Utc::now().format("%H:%M:%S"),
        state.filtered_tickers().len(),
        state.raw_tickers().len(),
        state.sort_option()
    );
    if !state.search_query().is_empty() {
        header.push_str(&format!(" | query=\"{}\"", state.search_query()));
    }
    if state.is_loading() {
        header.push_str(" | loading");
    }
    if state.error() != ErrorKind::None {
        header.push_str(&format!(" | error={}", state.error()));
    }

    let mut lines = Vec::with_capacity(state.filtered_tickers().len() + 1);
    lines.push(header);
    lines.extend(state.filtered_tickers().iter().map(|t| {
        format!(
            "  {:<6} {:<26} {:>14.4} {:>+8.2}%  [{}]",
            t.symbol(),
            t.display_name(),
            t.last_price(),
            t.daily_change_percent() * 100.0,
            t.icon()
        )
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticker_common::{RawTicker, SortOption};

    fn state() -> TickersState {
        TickersState::default().with_tickers(vec![
            RawTicker::new("BTC", "Bitcoin", 50000.0, 0.0123).into(),
            RawTicker::new("ETH", "Ethereum", 3000.0, -0.02).into(),
        ])
    }

    #[test]
    fn text_lists_visible_tickers_under_a_header() {
        let lines = render_lines(&state().with_sort_option(SortOption::PriceAsc));

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2/2 tickers | sort=price-asc"));
        assert!(!lines[0].contains("loading"));
        assert!(lines[1].contains("ETH") && lines[1].contains("-2.00%"));
        assert!(lines[2].contains("Bitcoin") && lines[2].contains("+1.23%"));
        assert!(lines[2].ends_with("[bitcoin]"));
    }

    #[test]
    fn header_shows_query_loading_and_error() {
        let state = state()
            .with_search_query("eth")
            .loading()
            .with_error(ErrorKind::Server)
            .loading();
        let lines = render_lines(&state);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1/2 tickers"));
        assert!(lines[0].contains("query=\"eth\""));
        assert!(lines[0].contains("loading"));
        assert!(lines[0].contains("error=Server"));
    }

    #[test]
    fn json_frame_flattens_the_snapshot() {
        let state = state();
        let frame = Frame {
            timestamp: 42,
            state: &state,
        };
        let json = serde_json::to_value(&frame).unwrap();

        assert_eq!(json["timestamp"], 42);
        assert_eq!(json["sort_option"], "PriceDesc");
        assert_eq!(json["filtered_tickers"][1]["symbol"], "ETH");
        assert_eq!(json["filtered_tickers"][1]["icon"], "ethereum");
    }
}
