//! Error types for building rate quotes.

use thiserror::Error;

/// Errors raised while turning raw rates into a `RateQuote`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// Rate text is not a decimal number.
    #[error("Invalid rate value: {0:?}")]
    InvalidNumber(String),

    /// Buy rate of zero makes the spread undefined.
    #[error("Buy rate is zero for {bank}")]
    ZeroBuyRate { bank: String },
}

impl QuoteError {
    /// Get error code for log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidNumber(_) => "INVALID_NUMBER",
            QuoteError::ZeroBuyRate { .. } => "ZERO_BUY_RATE",
        }
    }
}

/// Result type alias for quote construction.
pub type QuoteResult<T> = std::result::Result<T, QuoteError>;
