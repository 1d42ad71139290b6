//! Generic reconciliation driver.
//!
//! One `GenericOperand` instance drives one managed resource kind through a
//! uniform fetch-compare-correct cycle: build the desired object, fetch the
//! observed one, create it when missing, otherwise let the kind's hooks
//! compare and correct, record drift metrics, and finalize.

use std::sync::Arc;

use hco_metrics::HcoMetrics;
use kube::api::DynamicObject;
use tracing::{info, warn};

use crate::client::{ClientError, ClusterClient, ObjectKey};
use crate::error::OperandError;
use crate::hooks::OperandHooks;
use crate::request::ReconcileRequest;

/// Outcome of one ensure pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnsureResult {
    /// The object did not exist and was created from the desired object
    pub created: bool,
    /// A cluster write was issued (create or corrective update)
    pub updated: bool,
    /// The write corrected an out-of-band modification
    pub overwritten: bool,
}

/// Drives one resource kind through fetch, compare, correct and finalize.
///
/// The driver performs no internal parallelism or retries; each `ensure`
/// call runs to completion in the caller's task, and the caller guarantees
/// at most one in-flight pass per (kind, namespace, name).
pub struct GenericOperand {
    client: Arc<dyn ClusterClient>,
    metrics: Arc<HcoMetrics>,
    cr_type: &'static str,
    hooks: Box<dyn OperandHooks>,
}

impl GenericOperand {
    /// Binds a driver to one kind's hooks.
    ///
    /// The metrics registry is passed in explicitly; the driver never touches
    /// global state.
    pub fn new(
        client: Arc<dyn ClusterClient>,
        metrics: Arc<HcoMetrics>,
        cr_type: &'static str,
        hooks: Box<dyn OperandHooks>,
    ) -> Self {
        Self { client, metrics, cr_type, hooks }
    }

    /// The resource kind this driver manages
    pub fn cr_type(&self) -> &'static str {
        self.cr_type
    }

    /// Runs one reconciliation pass.
    ///
    /// Client errors other than not-found abort immediately; conflicts are
    /// surfaced, not retried. `just_before_complete` runs on every path that
    /// reached the create-or-compare decision, whatever its outcome.
    pub async fn ensure(&self, req: &ReconcileRequest) -> Result<EnsureResult, OperandError> {
        let desired = self.hooks.full_cr(req)?;
        let empty = self.hooks.empty_cr();
        let key = ObjectKey::from_object(&empty).ok_or_else(|| {
            OperandError::InvalidCr(format!("{} stub carries no name", self.cr_type))
        })?;

        let result = match self.client.get(&key).await {
            Ok(observed) => self.handle_existing(req, &key, &observed, &desired).await,
            Err(ClientError::NotFound(_)) => self.create_new(&key, &desired).await,
            Err(err) => return Err(err.into()),
        };

        self.hooks.just_before_complete(req);
        result
    }

    async fn create_new(
        &self,
        key: &ObjectKey,
        desired: &DynamicObject,
    ) -> Result<EnsureResult, OperandError> {
        info!(kind = self.cr_type, object = %key, "Creating resource");
        self.client.create(desired).await?;
        Ok(EnsureResult { created: true, updated: true, overwritten: false })
    }

    async fn handle_existing(
        &self,
        req: &ReconcileRequest,
        key: &ObjectKey,
        observed: &DynamicObject,
        desired: &DynamicObject,
    ) -> Result<EnsureResult, OperandError> {
        let update = self
            .hooks
            .update_cr(req, self.client.as_ref(), observed, desired)
            .await?;

        if update.overwritten {
            // Counted only after the corrective write succeeded
            if let Err(err) = self
                .metrics
                .inc_overwritten_modifications(self.cr_type, &key.name)
            {
                warn!(
                    kind = self.cr_type,
                    object = %key,
                    error = %err,
                    "Failed to record drift metric"
                );
            }
        }

        Ok(EnsureResult {
            created: false,
            updated: update.updated,
            overwritten: update.overwritten,
        })
    }
}
