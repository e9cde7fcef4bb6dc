//! FXBoard Server
//!
//! HTTP front of the rate service. Each `GET /api/rates` query looks up one
//! fallback mid rate, then scrapes six bank pages in turn and returns a quote
//! per bank, estimated from the fallback rate wherever a page could not be read.

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{RateServer, ServerError};
pub use state::ServerState;
