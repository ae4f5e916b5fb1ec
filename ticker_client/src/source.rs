//! Bitfinex ticker source.
//!
//! Fetches the latest quotes of a fixed list of trading pairs from the public
//! `tickers` endpoint with a blocking HTTP client. The response is an array of
//! arrays; only the pair symbol (index 0), the relative daily change (index 6) and
//! the last price (index 7) are used.
//!
//! The request itself cannot be interrupted; the client timeout bounds how long a
//! cancelled cycle keeps its thread busy.

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use ticker_common::net::BASE_URL;
use ticker_common::{FetchError, RawTicker, Result, TickerError};
use ticker_core::{CancellationToken, TickerSource};

/// A trading pair the client asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    /// Pair symbol as it appears on the wire (e.g., `tBTCUSD`).
    pub wire: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Short symbol shown to the user.
    pub symbol: &'static str,
}

const fn listing(wire: &'static str, name: &'static str, symbol: &'static str) -> Listing {
    Listing { wire, name, symbol }
}

/// Every pair requested from the API, in display order.
pub const LISTINGS: &[Listing] = &[
    listing("tBTCUSD", "Bitcoin", "BTC"),
    listing("tETHUSD", "Ethereum", "ETH"),
    listing("tCHSB:USD", "SwissBorg", "CHSB"),
    listing("tLTCUSD", "Litecoin", "LTC"),
    listing("tXRPUSD", "Ripple", "XRP"),
    listing("tDSHUSD", "Dash", "DSH"),
    listing("tRRTUSD", "Recovery Right Token", "RRT"),
    listing("tEOSUSD", "EOS", "EOS"),
    listing("tSANUSD", "Santiment", "SAN"),
    listing("tDATUSD", "Data", "DAT"),
    listing("tSNTUSD", "Status", "SNT"),
    listing("tDOGE:USD", "Dogecoin", "DOGE"),
    listing("tLUNA:USD", "Terra", "LUNA"),
    listing("tMATIC:USD", "Polygon", "MATIC"),
    listing("tNEXO:USD", "Nexo", "NEXO"),
    listing("tOCEAN:USD", "Ocean Protocol", "OCEAN"),
    listing("tBEST:USD", "Bitpanda Ecosystem Token", "BEST"),
    listing("tAAVE:USD", "Aave", "AAVE"),
    listing("tPLUUSD", "Pluton", "PLU"),
    listing("tFILUSD", "Filecoin", "FIL"),
];

const WIRE_SYMBOL: usize = 0;
const DAILY_CHANGE_RELATIVE: usize = 6;
const LAST_PRICE: usize = 7;

/// Ticker source backed by the Bitfinex public API.
pub struct BitfinexSource {
    client: Client,
    url: String,
}

impl BitfinexSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(BASE_URL, timeout)
    }

    /// Points the source at another server exposing the same `tickers` endpoint.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TickerError::Format(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: tickers_url(base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TickerSource for BitfinexSource {
    fn fetch_all(&self, cancel: &CancellationToken) -> Result<Vec<RawTicker>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Other("Fetch cancelled before the request".into()));
        }

        debug!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(map_request_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().map_err(map_request_error)?;
        parse_tickers(&body)
    }
}

/// Builds the `tickers` endpoint URL for every known listing.
pub fn tickers_url(base_url: &str) -> String {
    let symbols: Vec<&str> = LISTINGS.iter().map(|l| l.wire).collect();
    format!(
        "{}/tickers?symbols={}",
        base_url.trim_end_matches('/'),
        symbols.join(",")
    )
}

/// Decodes a `tickers` response body, keeping the order of the payload.
///
/// Pairs missing from [`LISTINGS`] are kept under their wire symbol without the
/// leading `t`.
pub fn parse_tickers(body: &[u8]) -> Result<Vec<RawTicker>, FetchError> {
    let rows: Vec<Vec<Value>> =
        serde_json::from_slice(body).map_err(|e| FetchError::Payload(e.to_string()))?;

    rows.iter().map(|row| parse_row(row)).collect()
}

fn parse_row(row: &[Value]) -> Result<RawTicker, FetchError> {
    let wire = row
        .get(WIRE_SYMBOL)
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::Payload("row without a symbol".into()))?;
    let number = |index: usize, field: &str| {
        row.get(index)
            .and_then(Value::as_f64)
            .ok_or_else(|| FetchError::Payload(format!("{}: missing {}", wire, field)))
    };
    let daily_change = number(DAILY_CHANGE_RELATIVE, "daily change")?;
    let last_price = number(LAST_PRICE, "last price")?;

    let ticker = match LISTINGS.iter().find(|l| l.wire == wire) {
        Some(l) => RawTicker::new(l.symbol, l.name, last_price, daily_change),
        None => {
            let symbol = wire.strip_prefix('t').unwrap_or(wire);
            RawTicker::new(symbol, symbol, last_price, daily_change)
        }
    };
    Ok(ticker)
}

/// Translates a client failure into the transport failure the controller classifies.
fn map_request_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    if let Some(status) = err.status() {
        return FetchError::Status(status.as_u16());
    }
    if err.is_decode() || err.is_body() {
        return FetchError::Payload(err.to_string());
    }
    if err.is_connect() {
        if let Some(cause) = connect_cause(&err) {
            return cause;
        }
    }
    FetchError::Other(err.to_string())
}

/// Looks through the cause chain for a resolver failure or an I/O error.
fn connect_cause(err: &reqwest::Error) -> Option<FetchError> {
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return Some(FetchError::Resolve(text));
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return Some(FetchError::Io(io::Error::new(io_err.kind(), text)));
        }
        source = cause.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    const PAYLOAD: &str = r#"[
        ["tBTCUSD", 50000, 1.2, 50001, 3.4, 900, 0.018, 50000.5, 1234.5, 51000, 49000],
        ["tDOGE:USD", 0.1, 1, 0.11, 2, -0.001, -0.0123, 0.105, 99, 0.12, 0.09],
        ["tNEWUSD", 1, 1, 1, 1, 0, 0.5, 2.25, 1, 1, 1]
    ]"#;

    /// Serves a single canned HTTP response and returns the base URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn url_lists_every_pair() {
        let url = tickers_url("https://api-pub.bitfinex.com/v2/");
        assert!(url.starts_with("https://api-pub.bitfinex.com/v2/tickers?symbols=tBTCUSD,tETHUSD,"));
        assert!(url.ends_with("tPLUUSD,tFILUSD"));
        assert_eq!(url.matches(',').count(), LISTINGS.len() - 1);
    }

    #[test]
    fn parses_known_and_unknown_pairs_in_order() {
        let tickers = parse_tickers(PAYLOAD.as_bytes()).unwrap();

        assert_eq!(tickers.len(), 3);
        assert_eq!(tickers[0], RawTicker::new("BTC", "Bitcoin", 50000.5, 0.018));
        assert_eq!(tickers[1], RawTicker::new("DOGE", "Dogecoin", 0.105, -0.0123));
        assert_eq!(tickers[2], RawTicker::new("NEWUSD", "NEWUSD", 2.25, 0.5));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(matches!(parse_tickers(b"{}"), Err(FetchError::Payload(_))));
        assert!(matches!(
            parse_tickers(br#"[["tBTCUSD", 1, 2]]"#),
            Err(FetchError::Payload(_))
        ));
        assert!(matches!(parse_tickers(b"[[42]]"), Err(FetchError::Payload(_))));
        assert!(parse_tickers(b"[]").unwrap().is_empty());
    }

    #[test]
    fn fetches_from_a_live_endpoint() {
        let base = serve_once("200 OK", PAYLOAD);
        let source = BitfinexSource::with_base_url(&base, Duration::from_secs(5)).unwrap();

        let tickers = source.fetch_all(&CancellationToken::new()).unwrap();
        assert_eq!(tickers.len(), 3);
        assert_eq!(tickers[0].symbol, "BTC");
    }

    #[test]
    fn non_ok_status_is_reported() {
        let base = serve_once("503 Service Unavailable", "[]");
        let source = BitfinexSource::with_base_url(&base, Duration::from_secs(5)).unwrap();

        let err = source.fetch_all(&CancellationToken::new()).unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
    }

    #[test]
    fn refused_connection_is_not_a_status() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let base = format!("http://127.0.0.1:{}", port);
        let source = BitfinexSource::with_base_url(&base, Duration::from_secs(5)).unwrap();

        let err = source.fetch_all(&CancellationToken::new()).unwrap_err();
        assert!(!matches!(err, FetchError::Status(_) | FetchError::Payload(_)));
    }

    #[test]
    fn cancelled_token_skips_the_request() {
        let source =
            BitfinexSource::with_base_url("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(source.fetch_all(&token), Err(FetchError::Other(_))));
    }
}
