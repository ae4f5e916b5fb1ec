//! Ticker values and helpers shared between the controller and the client.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Latest quote of a single instrument as delivered by a ticker source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTicker {
    /// Short symbol (e.g., `BTC`).
    pub symbol: String,
    /// Last traded price.
    pub last_price: f64,
    /// Price change over the last 24 hours, relative to the opening price.
    pub daily_change_percent: f64,
    /// Human-readable instrument name (e.g., `Bitcoin`).
    pub display_name: String,
}

impl RawTicker {
    /// Creates a new raw ticker.
    pub fn new(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        last_price: f64,
        daily_change_percent: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            last_price,
            daily_change_percent,
            display_name: display_name.into(),
        }
    }
}

/// Icon handle a presenter draws next to a ticker.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Icon {
    Bitcoin,
    Ethereum,
    SwissBorg,
    Litecoin,
    Ripple,
    Dash,
    Recovery,
    Eos,
    Santiment,
    Data,
    Dogecoin,
    Terra,
    Polygon,
    Nexo,
    Ocean,
    Bitpanda,
    Aave,
    Pluton,
    Filecoin,
}

impl Icon {
    /// Resolves the icon for a short symbol. Unknown symbols get the bitcoin icon.
    pub fn for_symbol(symbol: &str) -> Self {
        match symbol {
            "BTC" => Self::Bitcoin,
            "ETH" => Self::Ethereum,
            "CHSB" => Self::SwissBorg,
            "LTC" => Self::Litecoin,
            "XRP" => Self::Ripple,
            "DSH" => Self::Dash,
            "RRT" => Self::Recovery,
            "EOS" => Self::Eos,
            "SAN" | "SNT" => Self::Santiment,
            "DAT" => Self::Data,
            "DOGE" => Self::Dogecoin,
            "LUNA" => Self::Terra,
            "MATIC" => Self::Polygon,
            "NEXO" => Self::Nexo,
            "OCEAN" => Self::Ocean,
            "BEST" => Self::Bitpanda,
            "AAVE" => Self::Aave,
            "PLU" => Self::Pluton,
            "FIL" => Self::Filecoin,
            _ => Self::Bitcoin,
        }
    }
}

/// A `RawTicker` projected for display, with its icon resolved.
///
/// Only built from a `RawTicker`; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTicker {
    #[serde(flatten)]
    ticker: RawTicker,
    icon: Icon,
}

impl From<RawTicker> for ViewTicker {
    fn from(ticker: RawTicker) -> Self {
        let icon = Icon::for_symbol(&ticker.symbol);
        Self { ticker, icon }
    }
}

impl ViewTicker {
    /// Short symbol.
    pub fn symbol(&self) -> &str {
        &self.ticker.symbol
    }

    /// Human-readable instrument name.
    pub fn display_name(&self) -> &str {
        &self.ticker.display_name
    }

    /// Last traded price.
    pub fn last_price(&self) -> f64 {
        self.ticker.last_price
    }

    /// Daily change, relative to the opening price.
    pub fn daily_change_percent(&self) -> f64 {
        self.ticker.daily_change_percent
    }

    /// Resolved icon handle.
    pub fn icon(&self) -> Icon {
        self.icon
    }

    /// The quote this view was derived from.
    pub fn raw(&self) -> &RawTicker {
        &self.ticker
    }
}

/// Ordering applied to the visible ticker list.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortOption {
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    #[default]
    PriceDesc,
    /// Worst daily performer first.
    ChangeAsc,
    /// Best daily performer first.
    ChangeDesc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_ticker_resolves_icon_from_symbol() {
        let view = ViewTicker::from(RawTicker::new("ETH", "Ethereum", 3000.0, 0.01));
        assert_eq!(view.icon(), Icon::Ethereum);
        assert_eq!(view.display_name(), "Ethereum");
        assert_eq!(view.last_price(), 3000.0);
    }

    #[test]
    fn unknown_symbol_falls_back_to_bitcoin_icon() {
        assert_eq!(Icon::for_symbol("XYZ"), Icon::Bitcoin);
        assert_eq!(Icon::for_symbol("SNT"), Icon::Santiment);
    }

    #[test]
    fn icon_names_are_snake_case() {
        assert_eq!(Icon::SwissBorg.to_string(), "swiss_borg");
        assert_eq!(Icon::SwissBorg.as_ref(), "swiss_borg");
    }

    #[test]
    fn sort_option_defaults_to_price_descending() {
        assert_eq!(SortOption::default(), SortOption::PriceDesc);
        assert_eq!(
            "Change-Asc".parse::<SortOption>().unwrap(),
            SortOption::ChangeAsc
        );
        assert_eq!(SortOption::ChangeDesc.to_string(), "change-desc");
    }
}
