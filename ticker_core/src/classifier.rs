//! Maps source failures onto the error kinds a presenter understands.

use crate::state::ErrorKind;
use std::io;
use ticker_common::FetchError;

/// Classifies a transport failure. Never fails: anything unrecognised is `Unknown`.
///
/// - HTTP 4xx → `Network`
/// - HTTP 5xx → `Server`
/// - address resolution failure or no route → `Network`
/// - everything else → `Unknown`
pub fn classify(error: &FetchError) -> ErrorKind {
    match error {
        FetchError::Status(400..=499) => ErrorKind::Network,
        FetchError::Status(500..=599) => ErrorKind::Server,
        FetchError::Resolve(_) | FetchError::NoRoute(_) => ErrorKind::Network,
        FetchError::Io(e) => match e.kind() {
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                ErrorKind::Network
            }
            _ => ErrorKind::Unknown,
        },
        _ => ErrorKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_network_errors() {
        assert_eq!(classify(&FetchError::Status(400)), ErrorKind::Network);
        assert_eq!(classify(&FetchError::Status(429)), ErrorKind::Network);
        assert_eq!(classify(&FetchError::Status(499)), ErrorKind::Network);
    }

    #[test]
    fn server_errors_are_server_errors() {
        assert_eq!(classify(&FetchError::Status(500)), ErrorKind::Server);
        assert_eq!(classify(&FetchError::Status(503)), ErrorKind::Server);
        assert_eq!(classify(&FetchError::Status(599)), ErrorKind::Server);
    }

    #[test]
    fn resolution_and_routing_failures_are_network_errors() {
        let dns = FetchError::Resolve("api-pub.bitfinex.com".into());
        assert_eq!(classify(&dns), ErrorKind::Network);
        assert_eq!(
            classify(&FetchError::NoRoute("10.0.0.1".into())),
            ErrorKind::Network
        );
        let unreachable = io::Error::from(io::ErrorKind::NetworkUnreachable);
        assert_eq!(classify(&FetchError::Io(unreachable)), ErrorKind::Network);
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(classify(&FetchError::Status(302)), ErrorKind::Unknown);
        assert_eq!(classify(&FetchError::Status(600)), ErrorKind::Unknown);
        assert_eq!(classify(&FetchError::Timeout), ErrorKind::Unknown);
        assert_eq!(
            classify(&FetchError::Payload("not an array".into())),
            ErrorKind::Unknown
        );
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(classify(&FetchError::Io(refused)), ErrorKind::Unknown);
        assert_eq!(
            classify(&FetchError::Other("boom".into())),
            ErrorKind::Unknown
        );
    }
}
