//! Shared endpoint constants and helpers used by the controller and the client.

/// Base URL of the public Bitfinex REST API.
pub const BASE_URL: &str = "https://api-pub.bitfinex.com/v2";
/// Host probed by the connectivity monitor.
pub const PROBE_HOST: &str = "api-pub.bitfinex.com";
/// TCP port probed by the connectivity monitor.
pub const PROBE_PORT: u16 = 443;
/// Fixed delay between two successful fetches of a poll cycle.
pub const POLL_INTERVAL_MS: u64 = 5000;

/// Helper to format a host with a port like "host:port".
pub fn addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_joins_host_and_port() {
        assert_eq!(addr(PROBE_HOST, PROBE_PORT), "api-pub.bitfinex.com:443");
    }
}
