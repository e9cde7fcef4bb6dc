//! Currency codes and decimal rules for FXBoard rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuoteError;

/// Decimal places used for buy, sell and mid rates.
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Decimal places used for spread percentages.
pub const SPREAD_DECIMAL_PLACES: u32 = 2;

/// Spread estimation constants.
pub mod estimation {
    use rust_decimal::Decimal;

    /// Multiplier applied to a mid rate to estimate the buy rate (0.992).
    pub fn estimate_buy_multiplier() -> Decimal {
        Decimal::new(992, 3)
    }

    /// Multiplier applied to a mid rate to estimate the sell rate (1.008).
    pub fn estimate_sell_multiplier() -> Decimal {
        Decimal::new(1008, 3)
    }
}

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Name the currency is listed under on Chinese bank quotation pages.
    ///
    /// Only the currencies FXBoard quotes have a display name; any other code
    /// can never match a bank's table row.
    pub fn display_name(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "USD" => Some("美元"),
            "EUR" => Some("欧元"),
            "HKD" => Some("港币"),
            "JPY" => Some("日元"),
            "KRW" => Some("韩元"),
            "MYR" => Some("马来西亚林吉特"),
            _ => None,
        }
    }

    /// Check if bank pages list this currency.
    pub fn is_recognized(&self) -> bool {
        self.display_name().is_some()
    }

    /// Codes with a bank-page display name, in listing order.
    pub fn recognized() -> Vec<Currency> {
        ["USD", "EUR", "HKD", "JPY", "KRW", "MYR"]
            .into_iter()
            .map(Currency::new)
            .collect()
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn cny() -> Self {
        Self::new("CNY")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Round to `places` using banker's rounding and pin the scale, so the value
/// always renders with exactly `places` decimals.
pub fn round_fixed(value: Decimal, places: u32) -> Decimal {
    let mut rounded = value.round_dp(places);
    rounded.rescale(places);
    rounded
}

/// Parse rate text as published on a bank page.
pub fn parse_rate(text: &str) -> Result<Decimal, QuoteError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed).map_err(|_| QuoteError::InvalidNumber(trimmed.to_string()))
}
