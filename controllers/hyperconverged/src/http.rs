//! Metrics and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use hco_metrics::HcoMetrics;
use prometheus::{Encoder, TextEncoder};
use tracing::info;

use crate::error::ControllerError;

/// Serves `/metrics` and `/healthz` on `addr` until the process exits
pub async fn serve(addr: String, metrics: Arc<HcoMetrics>) -> Result<(), ControllerError> {
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz))
        .with_state(metrics);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ControllerError::Serve(format!("failed to bind {}: {}", addr, e)))?;
    info!("Metrics server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ControllerError::Serve(e.to_string()))
}

async fn metrics_handler(State(metrics): State<Arc<HcoMetrics>>) -> Result<String, StatusCode> {
    let mut buf = Vec::new();
    TextEncoder::new()
        .encode(&metrics.gather(), &mut buf)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buf).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn healthz() -> &'static str {
    "ok"
}
