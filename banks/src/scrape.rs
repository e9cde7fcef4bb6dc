//! Bank scraper trait and scrape outcomes.

use async_trait::async_trait;
use fxboard_common::Currency;
use tracing::{debug, warn};

use crate::error::ScrapeResult;

/// Buy and sell rates as published on a bank page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedRate {
    /// Bank display name.
    pub bank: String,
    /// Buy rate text, as accepted by the layout's cell check.
    pub buy_rate: String,
    /// Sell rate text; may still fail to parse.
    pub sell_rate: String,
}

/// Result of one scrape attempt, with every failure collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Rates were found on the page.
    Scraped(ScrapedRate),
    /// Page could not be fetched or held no usable row.
    Unavailable { bank: String },
}

impl ScrapeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeOutcome::Scraped(_))
    }

    pub fn bank(&self) -> &str {
        match self {
            ScrapeOutcome::Scraped(rate) => &rate.bank,
            ScrapeOutcome::Unavailable { bank } => bank,
        }
    }
}

/// Trait for bank quotation page scrapers.
#[async_trait]
pub trait BankScraper: Send + Sync {
    /// Get the bank display name.
    fn bank(&self) -> &str;

    /// Fetch and parse the bank page for a currency.
    async fn fetch_rate(&self, currency: &Currency) -> ScrapeResult<ScrapedRate>;

    /// Single best-effort attempt; errors are logged and never propagated.
    async fn scrape(&self, currency: &Currency) -> ScrapeOutcome {
        match self.fetch_rate(currency).await {
            Ok(rate) => {
                debug!(
                    bank = self.bank(),
                    currency = %currency,
                    buy = %rate.buy_rate,
                    sell = %rate.sell_rate,
                    "Scraped bank rate"
                );
                ScrapeOutcome::Scraped(rate)
            }
            Err(e) => {
                warn!(
                    bank = self.bank(),
                    currency = %currency,
                    error = %e,
                    no_match = e.is_no_match(),
                    "Bank scrape failed"
                );
                ScrapeOutcome::Unavailable {
                    bank: self.bank().to_string(),
                }
            }
        }
    }
}

/// Mock scraper for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockBankScraper {
    bank: String,
    rates: dashmap::DashMap<String, (String, String)>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockBankScraper {
    /// Create a mock with no published rates, so every scrape fails.
    pub fn new(bank: impl Into<String>) -> Self {
        Self {
            bank: bank.into(),
            rates: dashmap::DashMap::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Publish buy/sell text for a currency.
    pub fn set_rate(&self, currency: &Currency, buy: &str, sell: &str) {
        self.rates
            .insert(currency.code().to_string(), (buy.to_string(), sell.to_string()));
    }

    /// Number of fetch attempts seen.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl BankScraper for MockBankScraper {
    fn bank(&self) -> &str {
        &self.bank
    }

    async fn fetch_rate(&self, currency: &Currency) -> ScrapeResult<ScrapedRate> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        self.rates
            .get(currency.code())
            .map(|entry| {
                let (buy, sell) = entry.value();
                ScrapedRate {
                    bank: self.bank.clone(),
                    buy_rate: buy.clone(),
                    sell_rate: sell.clone(),
                }
            })
            .ok_or_else(|| crate::error::ScrapeError::NoMatchingRow {
                bank: self.bank.clone(),
                currency: currency.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scrape_success() {
        let scraper = MockBankScraper::new("中国银行");
        scraper.set_rate(&Currency::usd(), "710.50", "713.41");

        let outcome = scraper.scrape(&Currency::usd()).await;

        assert!(outcome.is_success());
        assert_eq!(
            outcome,
            ScrapeOutcome::Scraped(ScrapedRate {
                bank: "中国银行".to_string(),
                buy_rate: "710.50".to_string(),
                sell_rate: "713.41".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_scrape_failure_collapses() {
        let scraper = MockBankScraper::new("兴业银行");
        scraper.set_rate(&Currency::usd(), "710.50", "713.41");

        let outcome = scraper.scrape(&Currency::new("EUR")).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.bank(), "兴业银行");
        assert_eq!(scraper.calls(), 1);
    }
}
