//! FXBoard FX Engine
//!
//! Fallback mid-market rates, per-bank estimation and the aggregation of six
//! bank quotes into one rate report.
//!
//! # Features
//!
//! - Pluggable fallback rate provider (`FallbackRateProvider`)
//! - Fixed-multiplier spread estimation with per-bank offsets
//! - Best-effort aggregation: failed scrapes are estimated, broken banks skipped
//!
//! # Example
//!
//! ```rust,ignore
//! use fxboard_fx::{BankRateAggregator, ExchangeRateApiProvider, RateEngine};
//! use fxboard_common::Currency;
//!
//! let engine = RateEngine::new(Arc::new(provider), BankRateAggregator::new(banks));
//! let report = engine.query(&Currency::usd(), "buy").await?;
//! ```

pub mod engine;
pub mod provider;
pub mod estimate;
pub mod aggregator;
pub mod error;

pub use engine::{RateEngine, RateReport};
pub use provider::{ExchangeRateApiProvider, FallbackRateProvider};
pub use estimate::{estimate_spread, FallbackRate};
pub use aggregator::BankRateAggregator;
pub use error::{FxError, FxResult};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockFallbackProvider;
