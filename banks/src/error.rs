//! Scraper error types.

use fxboard_common::Currency;
use thiserror::Error;

/// Errors that can occur while scraping a bank page.
///
/// Every variant ends up as `ScrapeOutcome::Unavailable`; the variant only
/// survives in the logs.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Currency has no display name, so no bank row can match it.
    #[error("Currency {0} is not listed on bank pages")]
    UnsupportedCurrency(Currency),

    /// Page did not answer within the scrape timeout.
    #[error("Timed out fetching {bank} page")]
    Timeout { bank: String },

    /// Connection or transfer failure.
    #[error("Network error fetching {bank} page: {message}")]
    Network { bank: String, message: String },

    /// Page answered with a non-success status.
    #[error("{bank} page returned HTTP {status}")]
    HttpStatus { bank: String, status: u16 },

    /// No table row with numeric rates for the currency.
    #[error("No matching {currency} row on {bank} page")]
    NoMatchingRow { bank: String, currency: Currency },

    /// CSS selector failed to compile.
    #[error("Invalid selector {0:?}")]
    InvalidSelector(String),
}

impl ScrapeError {
    /// Classify a reqwest failure for the given bank.
    pub fn from_reqwest(bank: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ScrapeError::Timeout {
                bank: bank.to_string(),
            };
        }

        if let Some(status) = err.status() {
            return ScrapeError::HttpStatus {
                bank: bank.to_string(),
                status: status.as_u16(),
            };
        }

        ScrapeError::Network {
            bank: bank.to_string(),
            message: err.to_string(),
        }
    }

    /// Check if the page was reached but held no usable row.
    pub fn is_no_match(&self) -> bool {
        matches!(
            self,
            ScrapeError::NoMatchingRow { .. } | ScrapeError::UnsupportedCurrency(_)
        )
    }
}

/// Result type for scrape operations.
pub type ScrapeResult<T> = Result<T, ScrapeError>;
