//! Kubernetes resource watchers.
//!
//! This module watches the managed ConfigMap for changes and queues an
//! externally-triggered reconciliation pass whenever one is seen. Passes the
//! operator initiates itself (startup, periodic resync) are queued elsewhere
//! and carry the controller-triggered flag instead.

use futures::TryStreamExt;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::Api;
use kube_runtime::watcher;
use operands::ReconcileRequest;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::ControllerError;

/// Watches the managed ConfigMap for out-of-band modifications
pub struct Watcher {
    api: Api<ConfigMap>,
    name: String,
    triggers: mpsc::Sender<ReconcileRequest>,
}

impl Watcher {
    /// Creates a new watcher instance
    pub fn new(
        api: Api<ConfigMap>,
        name: String,
        triggers: mpsc::Sender<ReconcileRequest>,
    ) -> Self {
        Self { api, name, triggers }
    }

    /// Starts watching the managed ConfigMap.
    ///
    /// Every apply or delete seen after the initial list is treated as an
    /// external change; the ensure pass it queues is idempotent, so events
    /// echoing the operator's own writes settle with no further cluster
    /// write.
    pub async fn watch_config_map(&self) -> Result<(), ControllerError> {
        info!("Starting ConfigMap watcher for {}", self.name);

        let config = watcher::Config::default().fields(&format!("metadata.name={}", self.name));
        let mut stream = Box::pin(watcher(self.api.clone(), config));

        while let Some(event) = stream
            .try_next()
            .await
            .map_err(|e| ControllerError::Watch(format!("Watcher stream error: {}", e)))?
        {
            match event {
                watcher::Event::Apply(cm) => {
                    let name = cm.metadata.name.as_deref().unwrap_or("<unknown>");
                    info!("ConfigMap applied: {}", name);
                    self.queue(ReconcileRequest::externally_triggered()).await?;
                }
                watcher::Event::Delete(cm) => {
                    let name = cm.metadata.name.as_deref().unwrap_or("<unknown>");
                    info!("ConfigMap deleted: {}", name);
                    self.queue(ReconcileRequest::externally_triggered()).await?;
                }
                watcher::Event::Init => {
                    debug!("ConfigMap watcher initialized");
                }
                watcher::Event::InitApply(cm) => {
                    // Initial list; the startup pass already covers it
                    let name = cm.metadata.name.as_deref().unwrap_or("<unknown>");
                    debug!("ConfigMap init apply: {}", name);
                }
                watcher::Event::InitDone => {
                    info!("ConfigMap watcher initialization complete");
                }
            }
        }

        Ok(())
    }

    async fn queue(&self, req: ReconcileRequest) -> Result<(), ControllerError> {
        self.triggers
            .send(req)
            .await
            .map_err(|e| ControllerError::Watch(format!("Trigger queue closed: {}", e)))
    }
}
