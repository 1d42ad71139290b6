//! The per-kind hook contract driven by the generic reconciler.

use async_trait::async_trait;
use kube::api::DynamicObject;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ClusterClient;
use crate::error::OperandError;
use crate::request::ReconcileRequest;

/// Outcome of one comparison-and-correction step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// A corrective write was issued
    pub updated: bool,
    /// The write corrected an out-of-band modification rather than applying
    /// the operator's own change; always `updated && !req.hco_triggered`
    pub overwritten: bool,
}

/// Capability set implemented once per managed resource kind.
///
/// The driver only ever holds this trait; all kind-specific schema knowledge
/// (payload layout, equality, correction policy) stays behind it.
#[async_trait]
pub trait OperandHooks: Send + Sync {
    /// Builds the fully-specified desired object for this pass.
    /// Failure aborts reconciliation of this operand only.
    fn full_cr(&self, req: &ReconcileRequest) -> Result<DynamicObject, OperandError>;

    /// Returns an identity-only stub (name/namespace) used to derive the
    /// fetch key; must not require the full payload
    fn empty_cr(&self) -> DynamicObject;

    /// Compares `observed` against `desired` and, on divergence, writes the
    /// corrected object through `client`.
    ///
    /// Equality semantics and the treatment of observed payload keys absent
    /// from the desired payload are per-hook policy, documented on each
    /// implementation. The no-divergence path must not issue any write.
    async fn update_cr(
        &self,
        req: &ReconcileRequest,
        client: &dyn ClusterClient,
        observed: &DynamicObject,
        desired: &DynamicObject,
    ) -> Result<UpdateResult, OperandError>;

    /// Finalization that runs regardless of whether a change occurred.
    /// There is no error channel by construction: nothing here may signal a
    /// fatal condition.
    fn just_before_complete(&self, req: &ReconcileRequest);
}

/// Serializes a typed Kubernetes object into its dynamic representation
pub fn to_dynamic<K>(obj: &K) -> Result<DynamicObject, OperandError>
where
    K: k8s_openapi::Resource + Serialize,
{
    Ok(serde_json::from_value(serde_json::to_value(obj)?)?)
}

/// Parses a dynamic object back into its typed representation.
///
/// A stored kind other than `K::KIND` is a type mismatch, fatal for the
/// current operand's pass only.
pub fn from_dynamic<K>(obj: &DynamicObject) -> Result<K, OperandError>
where
    K: k8s_openapi::Resource + DeserializeOwned,
{
    let found = obj
        .types
        .as_ref()
        .map_or("<unknown>", |types| types.kind.as_str());
    if found != K::KIND {
        return Err(OperandError::TypeMismatch {
            expected: K::KIND,
            found: found.to_string(),
        });
    }
    Ok(serde_json::from_value(serde_json::to_value(obj)?)?)
}
