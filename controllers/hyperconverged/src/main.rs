//! Hyperconverged Operator
//!
//! Drives managed operands to their opinionated state.
//!
//! This binary is wiring only: it loads the desired state of the managed
//! ConfigMap from a manifest, runs a startup reconciliation pass, watches the
//! object for out-of-band modifications, resyncs periodically, and serves
//! Prometheus metrics. All reconciliation semantics live in the `operands`
//! and `hco-metrics` library crates.

mod controller;
mod error;
mod http;
mod watcher;

use std::env;

use controller::Controller;
use error::ControllerError;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting Hyperconverged Operator");

    // Load configuration from environment variables
    let manifest_path = env::var("MANAGED_CONFIGMAP").map_err(|_| {
        ControllerError::InvalidConfig(
            "MANAGED_CONFIGMAP environment variable is required".to_string(),
        )
    })?;
    let namespace = env::var("WATCH_NAMESPACE").ok();
    let metrics_addr =
        env::var("METRICS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let resync_secs: u64 = env::var("RESYNC_PERIOD_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(300);

    info!("Configuration:");
    info!("  Managed ConfigMap manifest: {}", manifest_path);
    info!("  Namespace: {}", namespace.as_deref().unwrap_or("from manifest"));
    info!("  Metrics bind address: {}", metrics_addr);
    info!("  Resync period: {}s", resync_secs);

    // Initialize and run controller
    let controller = Controller::new(manifest_path, namespace, metrics_addr, resync_secs).await?;
    controller.run().await?;

    Ok(())
}
