//! FXBoard Common Types
//!
//! This crate contains the types shared across FXBoard: currencies and their
//! bank-page display names, decimal rounding rules, the per-bank `RateQuote`
//! record and timestamp helpers.

pub mod monetary;
pub mod quote;
pub mod error;
pub mod time;

pub use monetary::*;
pub use quote::*;
pub use error::*;
pub use time::*;
