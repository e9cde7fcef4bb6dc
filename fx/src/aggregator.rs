//! Bank rate aggregation.

use fxboard_banks::{BankConfig, ScrapeOutcome};
use fxboard_common::{parse_rate, Currency, QuoteResult, RateQuote, RateSource};
use tracing::{info, instrument, warn};

use crate::estimate::FallbackRate;

/// Walks the bank table in order and produces one quote per bank.
pub struct BankRateAggregator {
    banks: Vec<BankConfig>,
}

impl BankRateAggregator {
    /// Create a new aggregator over a fixed bank table.
    pub fn new(banks: Vec<BankConfig>) -> Self {
        Self { banks }
    }

    /// Get the configured banks, in report order.
    pub fn banks(&self) -> &[BankConfig] {
        &self.banks
    }

    /// Scrape every bank sequentially and quote it.
    ///
    /// Scraped banks are quoted from their own page; the rest are estimated
    /// from `fallback`. A bank whose quote cannot be built is logged and left
    /// out, so the result may hold fewer entries than there are banks.
    /// `trade_type` is informational only.
    #[instrument(skip(self, currency, trade_type, fallback), fields(currency = %currency, trade_type = %trade_type))]
    pub async fn aggregate(
        &self,
        currency: &Currency,
        trade_type: &str,
        fallback: &FallbackRate,
    ) -> Vec<RateQuote> {
        let mut quotes = Vec::with_capacity(self.banks.len());

        for bank in &self.banks {
            let outcome = bank.scraper.scrape(currency).await;

            match Self::quote_bank(bank, &outcome, fallback) {
                Ok(quote) => {
                    info!(
                        bank = %bank.name,
                        source = %quote.source(),
                        buy = %quote.buy_rate(),
                        sell = %quote.sell_rate(),
                        "Quoted bank"
                    );
                    quotes.push(quote);
                }
                Err(e) => {
                    warn!(
                        bank = %bank.name,
                        error = %e,
                        code = e.error_code(),
                        "Skipping bank"
                    );
                }
            }
        }

        quotes
    }

    fn quote_bank(
        bank: &BankConfig,
        outcome: &ScrapeOutcome,
        fallback: &FallbackRate,
    ) -> QuoteResult<RateQuote> {
        match outcome {
            ScrapeOutcome::Scraped(rate) => {
                let buy = parse_rate(&rate.buy_rate)?;
                let sell = parse_rate(&rate.sell_rate)?;
                RateQuote::new(&bank.name, &bank.icon, buy, sell, RateSource::Real)
            }
            ScrapeOutcome::Unavailable { .. } => {
                let (buy, sell) = fallback.estimate_for_offset(bank.offset)?;
                RateQuote::new(&bank.name, &bank.icon, buy, sell, RateSource::Estimated)
            }
        }
    }
}
