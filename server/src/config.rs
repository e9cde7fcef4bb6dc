//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use fxboard_common::time::constants;
use fxboard_fx::ExchangeRateApiProvider;

/// Fallback rate API configuration.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Base URL; the currency code is appended as the last path segment.
    pub base_url: String,
    /// Local currency read from the `rates` object.
    pub quote_currency: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            base_url: ExchangeRateApiProvider::DEFAULT_BASE_URL.to_string(),
            quote_currency: "CNY".to_string(),
            timeout: constants::fallback_timeout(),
        }
    }
}

/// Bank page scraping configuration.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Per-bank request timeout.
    pub timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout: constants::scrape_timeout(),
        }
    }
}

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Fallback rate API configuration.
    pub fallback: FallbackConfig,
    /// Scrape configuration.
    pub scrape: ScrapeConfig,
    /// Allow cross-origin requests from any origin.
    pub cors_enabled: bool,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 5000,
            fallback: FallbackConfig::default(),
            scrape: ScrapeConfig::default(),
            cors_enabled: true,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup; unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("FXBOARD_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("FXBOARD_LISTEN_PORT").and_then(|p| p.parse().ok()) {
            config.listen_port = port;
        }

        if let Some(url) = lookup("FXBOARD_FALLBACK_URL") {
            config.fallback.base_url = url;
        }

        if let Some(quote) = lookup("FXBOARD_QUOTE_CURRENCY") {
            config.fallback.quote_currency = quote;
        }

        if let Some(secs) = lookup("FXBOARD_FALLBACK_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            config.fallback.timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = lookup("FXBOARD_SCRAPE_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            config.scrape.timeout = Duration::from_secs(secs);
        }

        if let Some(enabled) = lookup("FXBOARD_CORS_ENABLED").and_then(|s| s.parse().ok()) {
            config.cors_enabled = enabled;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.listen_addr, self.listen_port)
            .parse()
            .map_err(|e| format!("Invalid listen address {}: {}", self.listen_addr, e))
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        self.socket_addr()?;

        if self.fallback.base_url.trim().is_empty() {
            return Err("Fallback URL cannot be empty".to_string());
        }

        if self.fallback.quote_currency.trim().is_empty() {
            return Err("Quote currency cannot be empty".to_string());
        }

        if self.fallback.timeout.is_zero() || self.scrape.timeout.is_zero() {
            return Err("Timeouts must be greater than zero".to_string());
        }

        Ok(())
    }
}
