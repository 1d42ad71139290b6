//! Controller-specific error types.
//!
//! This module defines error types specific to the hyperconverged operator
//! binary that are not covered by the library crates.

use kube::Error as KubeError;
use operands::OperandError;
use thiserror::Error;

/// Errors that can occur in the hyperconverged operator
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Operand reconciliation error
    #[error("Operand error: {0}")]
    Operand(#[from] OperandError),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] hco_metrics::MetricsError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Desired-state manifest could not be loaded
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),

    /// Metrics/probes server failed
    #[error("Metrics server failed: {0}")]
    Serve(String),
}
