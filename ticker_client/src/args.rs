//! Command-line arguments for the Ticker Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, ValueEnum};
use strum_macros::Display;
use ticker_common::SortOption;
use ticker_common::net::{POLL_INTERVAL_MS, PROBE_HOST, PROBE_PORT};

/// Where tickers are fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
    /// The public Bitfinex REST API.
    Bitfinex,
    /// Random-walk prices generated locally; no network needed.
    Simulated,
}

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Ticker source to poll.
    #[clap(long, value_enum, default_value_t = SourceKind::Bitfinex)]
    pub source: SourceKind,

    /// Delay between two successful fetches, in milliseconds.
    #[clap(long, default_value_t = POLL_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Initial search query applied to ticker names.
    #[clap(long, default_value = "")]
    pub query: String,

    /// Initial sort order.
    #[clap(long, value_enum, default_value_t = SortOption::PriceDesc)]
    pub sort: SortOption,

    /// Host probed to decide whether the network is available.
    #[clap(long, default_value = PROBE_HOST)]
    pub probe_host: String,

    /// TCP port probed on `probe_host`.
    #[clap(long, default_value_t = PROBE_PORT)]
    pub probe_port: u16,

    /// Delay between two connectivity probes, in milliseconds.
    #[clap(long, default_value_t = 3000)]
    pub probe_interval_ms: u64,

    /// Consecutive failed probes after which the connection is reported lost.
    #[clap(long, default_value_t = 3)]
    pub lost_after: u32,

    /// Print snapshots as JSON lines on stdout instead of log lines.
    #[clap(long)]
    pub json: bool,

    /// HTTP request timeout, in seconds.
    #[clap(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_poll_bitfinex_every_five_seconds() {
        let args = Args::parse_from(["ticker_client"]);
        assert_eq!(args.source, SourceKind::Bitfinex);
        assert_eq!(args.interval_ms, 5000);
        assert_eq!(args.sort, SortOption::PriceDesc);
        assert_eq!(args.query, "");
        assert_eq!(args.probe_host, "api-pub.bitfinex.com");
        assert_eq!(args.probe_port, 443);
        assert!(!args.json);
    }

    #[test]
    fn parses_source_and_sort() {
        let args = Args::parse_from([
            "ticker_client",
            "--source",
            "simulated",
            "--sort",
            "change-asc",
            "--query",
            "coin",
            "--json",
        ]);
        assert_eq!(args.source, SourceKind::Simulated);
        assert_eq!(args.sort, SortOption::ChangeAsc);
        assert_eq!(args.query, "coin");
        assert!(args.json);
    }
}
