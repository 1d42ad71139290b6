//! Generic operand reconciliation engine
//!
//! A pluggable fetch-compare-correct driver for Kubernetes operands. Each
//! managed resource kind supplies a small hook implementation
//! ([`OperandHooks`]); the generic driver ([`GenericOperand`]) owns the
//! cycle: build the desired object, fetch the observed one, create it when
//! missing, otherwise compare and correct, record drift metrics, finalize.
//!
//! Externally-made customizations the operator does not own (foreign labels)
//! survive reconciliation; the no-divergence path issues no cluster write.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hco_metrics::HcoMetrics;
//! use k8s_openapi::api::core::v1::ConfigMap;
//! use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
//! use kube::api::ApiResource;
//! use operands::{new_cm_handler, KubeClusterClient, ReconcileRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let kube_client = kube::Client::try_default().await?;
//! let client = Arc::new(KubeClusterClient::new(
//!     kube_client,
//!     ApiResource::erase::<ConfigMap>(&()),
//! ));
//! let metrics = Arc::new(HcoMetrics::new()?);
//!
//! let desired = ConfigMap {
//!     metadata: ObjectMeta {
//!         name: Some("kubevirt-config".to_string()),
//!         namespace: Some("kubevirt-hyperconverged".to_string()),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let handler = new_cm_handler(client, metrics, desired);
//! let result = handler.ensure(&ReconcileRequest::controller_triggered()).await?;
//! println!("updated: {}", result.updated);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod configmap;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod labels;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod request;

#[cfg(test)]
mod configmap_test;

pub use client::{ClientError, ClusterClient, KubeClusterClient, ObjectKey};
pub use configmap::{new_cm_handler, ConfigMapHooks};
pub use error::OperandError;
pub use handler::{EnsureResult, GenericOperand};
pub use hooks::{from_dynamic, to_dynamic, OperandHooks, UpdateResult};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockClusterClient;
pub use request::ReconcileRequest;
