//! Prometheus metrics for the hyperconverged operator
//!
//! Provides a typed registry over a fixed set of operator metrics: a drift
//! counter for out-of-band modifications the operator overwrote, a gauge for
//! unsafe annotation overrides, and a boolean gauge flagging whether the
//! integrated Node Maintenance Operator is in use.
//!
//! The registry is an explicit value, not process-global state: construct it
//! once at startup and hand an `Arc` to every component that records or
//! exposes metrics.
//!
//! # Example
//!
//! ```
//! use hco_metrics::HcoMetrics;
//!
//! # fn main() -> Result<(), hco_metrics::MetricsError> {
//! let metrics = HcoMetrics::new()?;
//!
//! // Record a drift correction on a managed ConfigMap
//! metrics.inc_overwritten_modifications("ConfigMap", "kubevirt-config")?;
//! assert_eq!(
//!     metrics.get_overwritten_modifications_count("ConfigMap", "kubevirt-config")?,
//!     1.0,
//! );
//!
//! // Flag the Node Maintenance Operator as in use
//! metrics.set_nmo_in_use_gauge()?;
//! assert!(metrics.is_nmo_in_use()?);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod metrics;
#[cfg(test)]
mod metrics_test;

pub use error::MetricsError;
pub use metrics::{
    HcoMetrics, MetricDescription, COUNTER_LABEL_ANN_NAME, COUNTER_LABEL_COMP_NAME, NMO_IN_USE,
    NMO_NOT_IN_USE,
};
