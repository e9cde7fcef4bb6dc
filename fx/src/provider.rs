//! Fallback rate provider trait and implementations.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use fxboard_common::Currency;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{FxError, FxResult};
use crate::estimate::FallbackRate;

/// Trait for mid-market rate sources used when bank pages cannot be scraped.
#[async_trait]
pub trait FallbackRateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Get the mid rate of `currency` against the local currency.
    async fn get_fallback(&self, currency: &Currency) -> FxResult<FallbackRate>;
}

/// `GET {base_url}/{CODE}` → `{"rates": {"CNY": 7.1, ...}}`
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Provider backed by a public "latest rates" API such as exchangerate-api.com.
pub struct ExchangeRateApiProvider {
    base_url: String,
    quote_currency: Currency,
    client: reqwest::Client,
    timeout: Duration,
}

impl ExchangeRateApiProvider {
    /// Public endpoint used when no base URL is configured.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.exchangerate-api.com/v4/latest";

    /// Create a new provider.
    pub fn new(base_url: impl Into<String>, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            quote_currency: Currency::cny(),
            client,
            timeout,
        }
    }

    /// Set the local currency looked up in the `rates` object.
    pub fn with_quote_currency(mut self, quote: Currency) -> Self {
        self.quote_currency = quote;
        self
    }

    fn url_for(&self, currency: &Currency) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), currency.code())
    }

    /// Pull the quote currency's mid rate out of a decoded response.
    fn extract_mid(&self, currency: &Currency, response: &LatestRatesResponse) -> FxResult<Decimal> {
        let value = response
            .rates
            .get(self.quote_currency.code())
            .copied()
            .ok_or_else(|| FxError::MissingRate {
                base: currency.clone(),
                quote: self.quote_currency.clone(),
            })?;

        let invalid = || FxError::InvalidRate {
            currency: currency.clone(),
            value: value.to_string(),
        };

        if !value.is_finite() || value <= 0.0 {
            return Err(invalid());
        }

        // Go through the shortest decimal rendering so 7.1 stays 7.1.
        Decimal::from_str(&value.to_string()).map_err(|_| invalid())
    }
}

#[async_trait]
impl FallbackRateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "exchangerate-api"
    }

    #[instrument(skip(self, currency), fields(currency = %currency))]
    async fn get_fallback(&self, currency: &Currency) -> FxResult<FallbackRate> {
        let url = self.url_for(currency);

        let response: LatestRatesResponse = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| FxError::from_reqwest(currency, e))?
            .json()
            .await
            .map_err(|e| FxError::from_reqwest(currency, e))?;

        let mid = self.extract_mid(currency, &response)?;
        debug!(mid = %mid, quote = %self.quote_currency, "Got fallback mid rate");

        FallbackRate::from_mid(currency.clone(), mid).map_err(|e| FxError::InvalidRate {
            currency: currency.clone(),
            value: e.to_string(),
        })
    }
}

/// Mock fallback provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockFallbackProvider {
    name: String,
    rates: dashmap::DashMap<String, Decimal>,
    timeouts: dashmap::DashSet<String>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockFallbackProvider {
    /// Create a new mock provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: dashmap::DashMap::new(),
            timeouts: dashmap::DashSet::new(),
        }
    }

    /// Set the mid rate for a currency.
    pub fn set_mid_rate(&self, currency: &Currency, mid: Decimal) {
        self.rates.insert(currency.code().to_string(), mid);
    }

    /// Make requests for a currency time out.
    pub fn set_timeout(&self, currency: &Currency) {
        self.timeouts.insert(currency.code().to_string());
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl FallbackRateProvider for MockFallbackProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_fallback(&self, currency: &Currency) -> FxResult<FallbackRate> {
        if self.timeouts.contains(currency.code()) {
            return Err(FxError::Timeout(currency.clone()));
        }

        let mid = self
            .rates
            .get(currency.code())
            .map(|r| *r)
            .ok_or_else(|| FxError::MissingRate {
                base: currency.clone(),
                quote: Currency::cny(),
            })?;

        FallbackRate::from_mid(currency.clone(), mid).map_err(|e| FxError::InvalidRate {
            currency: currency.clone(),
            value: e.to_string(),
        })
    }
}
