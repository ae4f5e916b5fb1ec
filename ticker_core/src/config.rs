//! Controller configuration.

use std::time::Duration;
use ticker_common::net::POLL_INTERVAL_MS;

/// Tunables of a `TickerStateController`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Delay between the end of a successful fetch and the start of the next one.
    pub poll_interval: Duration,
    /// Pending events kept for a slow consumer before the oldest is dropped.
    pub event_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            event_capacity: 64,
        }
    }
}

impl ControllerConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_event_capacity(mut self, event_capacity: usize) -> Self {
        self.event_capacity = event_capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_five_second_polling() {
        let config = ControllerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn setters_override_defaults() {
        let config = ControllerConfig::default()
            .with_poll_interval(Duration::from_millis(250))
            .with_event_capacity(8);
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.event_capacity, 8);
    }
}
