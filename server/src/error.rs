//! HTTP API errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fxboard_fx::FxError;
use serde::Serialize;
use thiserror::Error;

/// Message returned to clients when no rate report can be built.
pub const RATES_UNAVAILABLE_MESSAGE: &str = "无法获取汇率数据";

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Rates unavailable: {0}")]
    RatesUnavailable(#[from] FxError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RatesUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; internal details stay in the logs.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::RatesUnavailable(_) => RATES_UNAVAILABLE_MESSAGE,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
