//! Rate server: wires the engine from configuration and runs the HTTP loop.

use std::sync::Arc;

use fxboard_banks::BankConfig;
use fxboard_common::Currency;
use fxboard_fx::{BankRateAggregator, ExchangeRateApiProvider, RateEngine};
use parking_lot::RwLock;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::metrics::{Metrics, SharedMetrics};
use crate::routes::{router, AppState};
use crate::state::ServerState;

/// Server startup and runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The FXBoard rate server.
pub struct RateServer {
    config: ServerConfig,
    engine: Arc<RateEngine>,
    metrics: SharedMetrics,
    state: Arc<RwLock<ServerState>>,
}

impl RateServer {
    /// Create a server with the production provider and bank table.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        let client = reqwest::Client::builder().build()?;

        let provider = ExchangeRateApiProvider::new(
            config.fallback.base_url.clone(),
            client.clone(),
            config.fallback.timeout,
        )
        .with_quote_currency(Currency::new(config.fallback.quote_currency.as_str()));

        let banks = BankConfig::defaults(client, config.scrape.timeout);
        let engine = RateEngine::new(Arc::new(provider), BankRateAggregator::new(banks));

        Ok(Self::with_engine(config, engine))
    }

    /// Create a server around an already built engine.
    pub fn with_engine(config: ServerConfig, engine: RateEngine) -> Self {
        Self {
            config,
            engine: Arc::new(engine),
            metrics: Arc::new(Metrics::new()),
            state: Arc::new(RwLock::new(ServerState::Starting)),
        }
    }

    /// Get current state.
    pub fn state(&self) -> ServerState {
        *self.state.read()
    }

    /// Get shared metrics.
    pub fn metrics(&self) -> SharedMetrics {
        self.metrics.clone()
    }

    fn app_state(&self) -> AppState {
        AppState {
            engine: self.engine.clone(),
            metrics: self.metrics.clone(),
            state: self.state.clone(),
        }
    }

    /// Serve until Ctrl-C.
    pub async fn run(&self) -> Result<(), ServerError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
            }
        })
        .await
    }

    /// Bind the configured address and serve until `shutdown` completes.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), ServerError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr().map_err(ServerError::Config)?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = router(self.app_state(), self.config.cors_enabled);
        let state = self.state.clone();

        *self.state.write() = ServerState::Running;
        info!(
            addr = %listener.local_addr()?,
            banks = self.engine.bank_count(),
            fallback_url = %self.config.fallback.base_url,
            "Rate server running"
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Shutdown signal received");
                *state.write() = ServerState::ShuttingDown;
            })
            .await;

        *self.state.write() = ServerState::Stopped;

        let snapshot = self.metrics.snapshot();
        info!(
            requests_total = snapshot.requests_total,
            requests_failed = snapshot.requests_failed,
            quotes_real = snapshot.quotes_real,
            quotes_estimated = snapshot.quotes_estimated,
            banks_skipped = snapshot.banks_skipped,
            "Rate server stopped"
        );

        result.map_err(ServerError::from)
    }
}
