//! Fallback mid rate and fixed-multiplier spread estimation.

use fxboard_common::{estimation, round_fixed, Currency, QuoteError, QuoteResult, RATE_DECIMAL_PLACES};
use rust_decimal::Decimal;

/// Mid-market rate from the fallback provider with its estimated spread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRate {
    /// Currency the rate is quoted for.
    pub currency: Currency,
    /// Mid-market rate against the local currency.
    pub mid_rate: Decimal,
    /// `round(mid * 0.992, 4)`.
    pub buy_rate: Decimal,
    /// `round(mid * 1.008, 4)`.
    pub sell_rate: Decimal,
}

impl FallbackRate {
    /// Build a fallback rate from a mid rate.
    pub fn from_mid(currency: Currency, mid_rate: Decimal) -> QuoteResult<Self> {
        let (buy_rate, sell_rate) = estimate_spread(mid_rate)?;
        Ok(Self {
            currency,
            mid_rate,
            buy_rate,
            sell_rate,
        })
    }

    /// Estimated buy/sell for a bank whose quotes sit `offset` away from the
    /// mid rate: `base = mid * (1 + offset)`, then the fixed multipliers.
    pub fn estimate_for_offset(&self, offset: Decimal) -> QuoteResult<(Decimal, Decimal)> {
        let base = Decimal::ONE
            .checked_add(offset)
            .and_then(|factor| self.mid_rate.checked_mul(factor))
            .ok_or_else(|| QuoteError::InvalidNumber(format!("{} * (1 + {})", self.mid_rate, offset)))?;

        estimate_spread(base)
    }
}

/// Buy and sell rates around `base`, rounded to four places.
pub fn estimate_spread(base: Decimal) -> QuoteResult<(Decimal, Decimal)> {
    let buy = base.checked_mul(estimation::estimate_buy_multiplier());
    let sell = base.checked_mul(estimation::estimate_sell_multiplier());

    match (buy, sell) {
        (Some(buy), Some(sell)) => Ok((
            round_fixed(buy, RATE_DECIMAL_PLACES),
            round_fixed(sell, RATE_DECIMAL_PLACES),
        )),
        _ => Err(QuoteError::InvalidNumber(base.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxboard_banks::BANK_PROFILES;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fallback_spread() {
        let fallback = FallbackRate::from_mid(Currency::usd(), dec!(7.1)).unwrap();

        assert_eq!(fallback.buy_rate, dec!(7.0432));
        assert_eq!(fallback.sell_rate, dec!(7.1568));
        assert_eq!(fallback.buy_rate.to_string(), "7.0432");
    }

    #[test]
    fn test_estimate_for_each_bank() {
        let fallback = FallbackRate::from_mid(Currency::usd(), dec!(7.1000)).unwrap();

        let estimates: Vec<(&str, Decimal, Decimal)> = BANK_PROFILES
            .iter()
            .map(|p| {
                let (buy, sell) = fallback.estimate_for_offset(p.offset()).unwrap();
                (p.code, buy, sell)
            })
            .collect();

        // base = 7.1 * (1 + offset); buy = base * 0.992; sell = base * 1.008
        assert_eq!(
            estimates,
            vec![
                ("BOC", dec!(7.0573), dec!(7.1711)),
                ("ICBC", dec!(7.0362), dec!(7.1496)),
                ("CCB", dec!(7.0643), dec!(7.1783)),
                ("ABC", dec!(7.0291), dec!(7.1425)),
                ("COMM", dec!(7.0502), dec!(7.1640)),
                ("CIB", dec!(7.0221), dec!(7.1353)),
            ]
        );
    }

    #[test]
    fn test_zero_offset_matches_fallback() {
        let fallback = FallbackRate::from_mid(Currency::new("EUR"), dec!(7.7312)).unwrap();

        let (buy, sell) = fallback.estimate_for_offset(Decimal::ZERO).unwrap();

        assert_eq!((buy, sell), (fallback.buy_rate, fallback.sell_rate));
    }

    #[test]
    fn test_overflow_reported() {
        assert!(estimate_spread(Decimal::MAX).is_err());
    }

    proptest! {
        #[test]
        fn prop_sell_above_buy(mid in 1u64..100_000_000u64, offset_bps in -100i64..100i64) {
            let mid = Decimal::new(mid as i64, 6);
            let fallback = FallbackRate::from_mid(Currency::usd(), mid).unwrap();
            let (buy, sell) = fallback.estimate_for_offset(Decimal::new(offset_bps, 4)).unwrap();

            prop_assert!(sell >= buy);
            prop_assert_eq!(buy.scale(), 4);
            prop_assert_eq!(sell.scale(), 4);
        }

        #[test]
        fn prop_estimate_is_formula(mid in 1_000u64..10_000_000u64, offset_bps in -50i64..50i64) {
            let mid = Decimal::new(mid as i64, 4);
            let offset = Decimal::new(offset_bps, 4);
            let fallback = FallbackRate::from_mid(Currency::usd(), mid).unwrap();

            let base = mid * (Decimal::ONE + offset);
            let expected = (
                (base * dec!(0.992)).round_dp(4),
                (base * dec!(1.008)).round_dp(4),
            );

            prop_assert_eq!(fallback.estimate_for_offset(offset).unwrap(), expected);
        }
    }
}
