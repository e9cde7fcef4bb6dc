//! Per-bank rate quote emitted in every rate report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QuoteError, QuoteResult};
use crate::monetary::{round_fixed, RATE_DECIMAL_PLACES, SPREAD_DECIMAL_PLACES};

/// Where a quote's buy and sell rates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Scraped from the bank's own quotation page.
    Real,
    /// Derived from the fallback mid rate and the bank's fixed offset.
    Estimated,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Real => "real",
            RateSource::Estimated => "estimated",
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized buy/sell quote for one bank.
///
/// Rates carry four decimal places and the spread two; the scale is pinned so
/// the serialized strings always show every place (`"7.0500"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    bank: String,
    icon: String,
    buy_rate: Decimal,
    sell_rate: Decimal,
    spread: Decimal,
    mid_rate: Decimal,
    source: RateSource,
}

impl RateQuote {
    /// Build a quote from buy and sell rates, deriving spread and mid rate.
    ///
    /// Spread is `(sell - buy) / buy * 100` and mid is `(buy + sell) / 2`, both
    /// computed from the unrounded inputs.
    pub fn new(
        bank: impl Into<String>,
        icon: impl Into<String>,
        buy_rate: Decimal,
        sell_rate: Decimal,
        source: RateSource,
    ) -> QuoteResult<Self> {
        let bank = bank.into();

        if buy_rate.is_zero() {
            return Err(QuoteError::ZeroBuyRate { bank });
        }

        let spread = sell_rate
            .checked_sub(buy_rate)
            .and_then(|diff| diff.checked_div(buy_rate))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| QuoteError::InvalidNumber(format!("{buy_rate}/{sell_rate}")))?;

        let mid_rate = buy_rate
            .checked_add(sell_rate)
            .map(|sum| sum / Decimal::TWO)
            .ok_or_else(|| QuoteError::InvalidNumber(format!("{buy_rate}/{sell_rate}")))?;

        Ok(Self {
            bank,
            icon: icon.into(),
            buy_rate: round_fixed(buy_rate, RATE_DECIMAL_PLACES),
            sell_rate: round_fixed(sell_rate, RATE_DECIMAL_PLACES),
            spread: round_fixed(spread, SPREAD_DECIMAL_PLACES),
            mid_rate: round_fixed(mid_rate, RATE_DECIMAL_PLACES),
            source,
        })
    }

    pub fn bank(&self) -> &str {
        &self.bank
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn buy_rate(&self) -> Decimal {
        self.buy_rate
    }

    pub fn sell_rate(&self) -> Decimal {
        self.sell_rate
    }

    /// Spread as a percentage of the buy rate.
    pub fn spread(&self) -> Decimal {
        self.spread
    }

    pub fn mid_rate(&self) -> Decimal {
        self.mid_rate
    }

    pub fn source(&self) -> RateSource {
        self.source
    }

    /// Check if the quote was estimated rather than scraped.
    pub fn is_estimated(&self) -> bool {
        self.source == RateSource::Estimated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_real_quote_spread_and_mid() {
        let quote = RateQuote::new("中国银行", "中", dec!(7.1050), dec!(7.1250), RateSource::Real)
            .unwrap();

        assert_eq!(quote.spread().to_string(), "0.28");
        assert_eq!(quote.mid_rate().to_string(), "7.1150");
        assert_eq!(quote.source(), RateSource::Real);
        assert!(!quote.is_estimated());
    }

    #[test]
    fn test_rates_rendered_with_four_places() {
        let quote = RateQuote::new("交通银行", "交", dec!(710.5), dec!(713.41), RateSource::Real)
            .unwrap();

        assert_eq!(quote.buy_rate().to_string(), "710.5000");
        assert_eq!(quote.sell_rate().to_string(), "713.4100");
        assert_eq!(quote.mid_rate().to_string(), "711.9550");
        assert_eq!(quote.spread().to_string(), "0.41");
    }

    #[test]
    fn test_zero_buy_rate_rejected() {
        let result = RateQuote::new("兴业银行", "兴", Decimal::ZERO, dec!(1), RateSource::Real);

        assert!(matches!(result, Err(QuoteError::ZeroBuyRate { bank }) if bank == "兴业银行"));
    }

    #[test]
    fn test_serialized_shape() {
        let quote = RateQuote::new(
            "中国银行",
            "中",
            dec!(7.0573),
            dec!(7.1711),
            RateSource::Estimated,
        )
        .unwrap();

        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["bank"], "中国银行");
        assert_eq!(json["icon"], "中");
        assert_eq!(json["buyRate"], "7.0573");
        assert_eq!(json["sellRate"], "7.1711");
        assert_eq!(json["spread"], "1.61");
        assert_eq!(json["midRate"], "7.1142");
        assert_eq!(json["source"], "estimated");
    }
}
