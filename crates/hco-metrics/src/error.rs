//! Metrics registry errors

use thiserror::Error;

/// Errors that can occur when operating on the metrics registry
#[derive(Debug, Error)]
pub enum MetricsError {
    /// No metric is registered under the requested name
    #[error("unknown metric name {0}")]
    UnknownMetricName(String),

    /// The registered collector does not support the requested operation
    /// (e.g. incrementing a singleton gauge, or setting a counter)
    #[error("{0} is with unknown metric type")]
    UnknownMetricType(String),

    /// Error from the underlying Prometheus client
    /// (e.g. a label set that does not match the collector's dimensions)
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}
