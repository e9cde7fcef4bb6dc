//! Rate engine: one fallback lookup followed by bank aggregation.

use std::sync::Arc;

use fxboard_common::{format_timestamp, now, Currency, RateQuote};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::aggregator::BankRateAggregator;
use crate::error::{FxError, FxResult};
use crate::provider::FallbackRateProvider;

/// Merged quotes for one currency, ready to be served.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateReport {
    pub currency: Currency,
    /// Echo of the requested trade type; does not affect the quotes.
    pub trade_type: String,
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    #[serde(rename = "data")]
    pub quotes: Vec<RateQuote>,
}

impl RateReport {
    /// Number of quotes scraped from bank pages.
    pub fn real_count(&self) -> usize {
        self.quotes.iter().filter(|q| !q.is_estimated()).count()
    }

    /// Number of quotes estimated from the fallback rate.
    pub fn estimated_count(&self) -> usize {
        self.quotes.iter().filter(|q| q.is_estimated()).count()
    }
}

/// The main rate engine.
pub struct RateEngine {
    provider: Arc<dyn FallbackRateProvider>,
    aggregator: BankRateAggregator,
}

impl RateEngine {
    /// Create a new rate engine.
    pub fn new(provider: Arc<dyn FallbackRateProvider>, aggregator: BankRateAggregator) -> Self {
        Self {
            provider,
            aggregator,
        }
    }

    /// Number of banks every report is built from.
    pub fn bank_count(&self) -> usize {
        self.aggregator.banks().len()
    }

    /// Build a rate report for `currency`.
    ///
    /// The fallback rate is required even when every bank scrapes cleanly; if
    /// it cannot be fetched no bank is contacted and the query fails.
    #[instrument(skip(self, currency, trade_type), fields(
        request_id = %Uuid::new_v4(),
        currency = %currency,
        trade_type = %trade_type
    ))]
    pub async fn query(&self, currency: &Currency, trade_type: &str) -> FxResult<RateReport> {
        info!("Querying rates");

        let fallback = self.provider.get_fallback(currency).await.map_err(|e| {
            warn!(
                provider = self.provider.name(),
                error = %e,
                code = e.error_code(),
                timeout = e.is_timeout(),
                "Fallback rate unavailable"
            );
            FxError::FallbackUnavailable {
                currency: currency.clone(),
                reason: e.to_string(),
            }
        })?;

        let quotes = self.aggregator.aggregate(currency, trade_type, &fallback).await;

        let report = RateReport {
            currency: currency.clone(),
            trade_type: trade_type.to_string(),
            timestamp: format_timestamp(&now()),
            quotes,
        };

        info!(
            quotes = report.quotes.len(),
            real = report.real_count(),
            estimated = report.estimated_count(),
            "Rate report ready"
        );

        Ok(report)
    }
}
