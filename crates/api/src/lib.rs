//! Flight Delay Prediction API Server
//!
//! Thin HTTP layer over the trained delay model: maps requests onto
//! flight queries and prediction errors onto status codes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use inference_engine::{PredictionService, TrainedModelState};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod settings;
pub mod error;
pub mod loader;
pub mod routes;

pub use settings::AppConfig;
pub use error::ApiError;
pub use loader::{load_dataset, read_dataset};

/// Application state shared across handlers
///
/// Read-only after startup, so handlers share it without locking.
pub struct AppState {
    /// Prediction service over the trained model
    pub service: PredictionService,
    /// Prometheus handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(model: Arc<TrainedModelState>, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            service: PredictionService::new(model),
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub airlines: usize,
    pub features: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(routes::predict::post_predict))
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let model = state.service.state();
    Json(HealthResponse {
        status: "OK".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        airlines: model.vocabulary().len(),
        features: model.whitelist().len(),
    })
}

/// Initialize logging; `RUST_LOG` takes precedence over `default_level`
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, ApiError> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Run the server until the listener fails
pub async fn run_server(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
