//! FXBoard Bank Scrapers
//!
//! Best-effort scrapers for the foreign exchange quotation pages of six
//! Chinese banks.
//!
//! # Features
//!
//! - One `BankScraper` trait; failures collapse into `ScrapeOutcome::Unavailable`
//! - A configuration-driven `TableScraper` shared by every bank
//! - Static bank table (`BANK_PROFILES`) with display names, icons and offsets
//!
//! # Example
//!
//! ```rust,ignore
//! use fxboard_banks::BankConfig;
//! use fxboard_common::Currency;
//!
//! let banks = BankConfig::defaults(reqwest::Client::new(), Duration::from_secs(10));
//! for bank in &banks {
//!     let outcome = bank.scraper.scrape(&Currency::usd()).await;
//! }
//! ```

pub mod scrape;
pub mod table;
pub mod registry;
pub mod error;

pub use scrape::{BankScraper, ScrapeOutcome, ScrapedRate};
pub use table::{CellCheck, RowMatch, TableLayout, TableScraper};
pub use registry::{BankConfig, BankProfile, BANK_PROFILES};
pub use error::{ScrapeError, ScrapeResult};

#[cfg(any(test, feature = "test-utils"))]
pub use scrape::MockBankScraper;
