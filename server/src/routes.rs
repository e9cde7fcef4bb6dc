//! HTTP routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use fxboard_common::Currency;
use fxboard_fx::{RateEngine, RateReport};
use parking_lot::RwLock;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::ApiError;
use crate::metrics::SharedMetrics;
use crate::state::ServerState;

/// Message returned by the health check while the server is running.
pub const HEALTHY_MESSAGE: &str = "服务运行正常";

const INDEX_HTML: &str = include_str!("../static/index.html");

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RateEngine>,
    pub metrics: SharedMetrics,
    pub state: Arc<RwLock<ServerState>>,
}

/// Query string of `GET /api/rates`.
#[derive(Debug, Default)]
pub struct RatesQuery {
    pub currency: Option<String>,
    pub trade_type: Option<String>,
}

impl RatesQuery {
    /// Build from raw query pairs; the first occurrence of a key wins and
    /// unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "currency" => &mut query.currency,
                "tradeType" => &mut query.trade_type,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        query
    }

    /// Requested currency; a missing value means USD.
    ///
    /// A blank value is treated as missing too, rather than being sent to the
    /// fallback API and failing the whole request.
    pub fn currency(&self) -> Currency {
        match self.currency.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Currency::new(code),
            _ => Currency::usd(),
        }
    }

    /// Requested trade type, echoed back as given.
    pub fn trade_type(&self) -> &str {
        self.trade_type.as_deref().unwrap_or("buy")
    }
}

#[derive(Debug, Serialize)]
struct RatesResponse {
    success: bool,
    #[serde(flatten)]
    report: RateReport,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// Build the service router.
pub fn router(state: AppState, cors_enabled: bool) -> Router {
    let router = Router::new()
        .route("/", get(index))
        .route("/api/rates", get(rates))
        .route("/api/health", get(health))
        .route("/api/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// A blank `currency` falls back to USD instead of failing the fallback lookup.
async fn rates(
    State(app): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let query = RatesQuery::from_pairs(pairs);
    let currency = query.currency();
    let trade_type = query.trade_type();
    app.metrics.request_received();

    info!(currency = %currency, trade_type = %trade_type, "Rate query received");

    match app.engine.query(&currency, trade_type).await {
        Ok(report) => {
            app.metrics.record_report(&report, app.engine.bank_count());
            Ok(Json(RatesResponse {
                success: true,
                report,
            }))
        }
        Err(e) => {
            error!(currency = %currency, error = %e, "Rate query failed");
            app.metrics.request_failed();
            Err(ApiError::from(e))
        }
    }
}

/// Answers `ok` only while running; once shutdown begins it reports 503 with the
/// lifecycle state instead of a constant `ok`.
async fn health(State(app): State<AppState>) -> impl IntoResponse {
    let state = *app.state.read();

    if state.is_operational() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                message: HEALTHY_MESSAGE,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: state.as_str(),
                message: "服务不可用",
            }),
        )
    }
}

async fn metrics(State(app): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        app.metrics.to_prometheus(),
    )
}
