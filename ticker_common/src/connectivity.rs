//! Network status values reported by a connectivity monitor.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Connectivity state of the device as seen by a monitor.
///
/// `Losing` is informational: the link is degrading but still usable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ConnectivityStatus {
    /// A usable network is present.
    Available,
    /// No usable network was ever found.
    Unavailable,
    /// The current network is about to go away.
    Losing,
    /// The network that was in use went away.
    Lost,
}

impl ConnectivityStatus {
    /// Whether this status means the remote source cannot be reached.
    pub fn is_offline(self) -> bool {
        matches!(self, Self::Unavailable | Self::Lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_statuses() {
        assert!(!ConnectivityStatus::Available.is_offline());
        assert!(!ConnectivityStatus::Losing.is_offline());
        assert!(ConnectivityStatus::Unavailable.is_offline());
        assert!(ConnectivityStatus::Lost.is_offline());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            "lost".parse::<ConnectivityStatus>().unwrap(),
            ConnectivityStatus::Lost
        );
    }
}
