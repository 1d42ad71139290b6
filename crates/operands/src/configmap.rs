//! ConfigMap operand hooks.

use std::sync::Arc;

use async_trait::async_trait;
use hco_metrics::HcoMetrics;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::{ApiResource, DynamicObject};
use tracing::info;

use crate::client::ClusterClient;
use crate::error::OperandError;
use crate::handler::GenericOperand;
use crate::hooks::{from_dynamic, to_dynamic, OperandHooks, UpdateResult};
use crate::labels;
use crate::request::ReconcileRequest;

/// Builds a driver managing a single opinionated ConfigMap
pub fn new_cm_handler(
    client: Arc<dyn ClusterClient>,
    metrics: Arc<HcoMetrics>,
    required: ConfigMap,
) -> GenericOperand {
    GenericOperand::new(client, metrics, "ConfigMap", Box::new(ConfigMapHooks::new(required)))
}

/// Hooks for a ConfigMap whose `data` the operator fully owns.
///
/// Correction policy: the `data` map is replaced wholesale, so keys an
/// external actor added to the observed map are dropped. Labels follow the
/// shared merge rule — owned keys overwrite, foreign keys are preserved.
pub struct ConfigMapHooks {
    required: ConfigMap,
}

impl ConfigMapHooks {
    /// `required` is the fully-populated desired ConfigMap, name and
    /// namespace included
    pub fn new(required: ConfigMap) -> Self {
        Self { required }
    }
}

#[async_trait]
impl OperandHooks for ConfigMapHooks {
    fn full_cr(&self, _req: &ReconcileRequest) -> Result<DynamicObject, OperandError> {
        to_dynamic(&self.required)
    }

    fn empty_cr(&self) -> DynamicObject {
        let mut stub = DynamicObject::new(
            self.required.metadata.name.as_deref().unwrap_or_default(),
            &ApiResource::erase::<ConfigMap>(&()),
        );
        stub.metadata.namespace = self.required.metadata.namespace.clone();
        stub
    }

    async fn update_cr(
        &self,
        req: &ReconcileRequest,
        client: &dyn ClusterClient,
        observed: &DynamicObject,
        _desired: &DynamicObject,
    ) -> Result<UpdateResult, OperandError> {
        let found: ConfigMap = from_dynamic(observed)?;
        let required = &self.required;

        if found.data == required.data
            && labels::compare_labels(&required.metadata, &found.metadata)
        {
            return Ok(UpdateResult::default());
        }

        let name = required.metadata.name.as_deref().unwrap_or_default();
        if req.hco_triggered {
            info!(name, "Updating existing ConfigMap to new opinionated values");
        } else {
            info!(name, "Reconciling an externally updated ConfigMap to its opinionated values");
        }

        let mut corrected = found;
        labels::merge_labels(&required.metadata, &mut corrected.metadata);
        corrected.data = required.data.clone();
        client.update(&to_dynamic(&corrected)?).await?;

        Ok(UpdateResult { updated: true, overwritten: !req.hco_triggered })
    }

    fn just_before_complete(&self, _req: &ReconcileRequest) { /* no implementation */ }
}
