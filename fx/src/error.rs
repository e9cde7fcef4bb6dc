//! FX engine error types.

use fxboard_common::Currency;
use thiserror::Error;

/// Errors that can occur in the FX engine.
#[derive(Debug, Error)]
pub enum FxError {
    /// No fallback mid rate could be obtained; the whole query fails.
    #[error("Fallback rate unavailable for {currency}: {reason}")]
    FallbackUnavailable { currency: Currency, reason: String },

    /// Rate API did not answer within the timeout.
    #[error("Rate request for {0} timed out")]
    Timeout(Currency),

    /// Rate API returned an error or an undecodable body.
    #[error("Rate provider error: {0}")]
    ProviderError(String),

    /// Response held no rate for the quote currency.
    #[error("Rate {base}/{quote} missing from provider response")]
    MissingRate { base: Currency, quote: Currency },

    /// Rate present but not a positive finite number.
    #[error("Invalid rate {value} for {currency}")]
    InvalidRate { currency: Currency, value: String },
}

impl FxError {
    /// Classify a reqwest failure for the given currency.
    pub fn from_reqwest(currency: &Currency, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FxError::Timeout(currency.clone())
        } else {
            FxError::ProviderError(err.to_string())
        }
    }

    /// Check if this error was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FxError::Timeout(_))
    }

    /// Get error code for log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::FallbackUnavailable { .. } => "FALLBACK_UNAVAILABLE",
            FxError::Timeout(_) => "TIMEOUT",
            FxError::ProviderError(_) => "PROVIDER_ERROR",
            FxError::MissingRate { .. } => "MISSING_RATE",
            FxError::InvalidRate { .. } => "INVALID_RATE",
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
