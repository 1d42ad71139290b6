//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the operand
//! driver to a live cluster: it loads the desired ConfigMap manifest, runs a
//! startup ensure pass, supervises the watcher, the periodic resync and the
//! metrics server, and drains the trigger queue.

use std::sync::Arc;
use std::time::Duration;

use hco_metrics::HcoMetrics;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::ApiResource;
use kube::{Api, Client};
use operands::{new_cm_handler, GenericOperand, KubeClusterClient, ReconcileRequest};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::ControllerError;
use crate::http;
use crate::watcher::Watcher;

/// Main controller for the hyperconverged operator
pub struct Controller {
    operand: GenericOperand,
    triggers: mpsc::Receiver<ReconcileRequest>,
    watcher: JoinHandle<Result<(), ControllerError>>,
    metrics_server: JoinHandle<Result<(), ControllerError>>,
    resync: JoinHandle<()>,
}

impl Controller {
    /// Creates a new controller instance
    pub async fn new(
        manifest_path: String,
        namespace: Option<String>,
        metrics_addr: String,
        resync_secs: u64,
    ) -> Result<Self, ControllerError> {
        info!("Initializing Hyperconverged Operator");

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;

        // Load the desired state of the managed ConfigMap
        let required = load_config_map(&manifest_path, namespace.as_deref())?;
        let name = required.metadata.name.clone().ok_or_else(|| {
            ControllerError::InvalidConfig(
                "managed ConfigMap manifest has no metadata.name".to_string(),
            )
        })?;
        let cm_namespace = required.metadata.namespace.clone().ok_or_else(|| {
            ControllerError::InvalidConfig(
                "managed ConfigMap needs a namespace (set WATCH_NAMESPACE or metadata.namespace)"
                    .to_string(),
            )
        })?;

        // Metrics registry is constructed once and shared explicitly
        let metrics = Arc::new(HcoMetrics::new()?);

        // Build the operand driver
        let cluster_client = Arc::new(KubeClusterClient::new(
            kube_client.clone(),
            ApiResource::erase::<ConfigMap>(&()),
        ));
        let operand = new_cm_handler(cluster_client, metrics.clone(), required);

        // Reconciliation triggers: watcher events and periodic resync
        let (tx, rx) = mpsc::channel(16);

        let api: Api<ConfigMap> = Api::namespaced(kube_client, &cm_namespace);
        let watcher_instance = Watcher::new(api, name, tx.clone());
        let watcher = tokio::spawn(async move { watcher_instance.watch_config_map().await });

        let resync = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(resync_secs));
            // The immediate first tick is covered by the startup pass
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(ReconcileRequest::controller_triggered()).await.is_err() {
                    break;
                }
            }
        });

        let metrics_server = tokio::spawn(http::serve(metrics_addr, metrics));

        Ok(Self { operand, triggers: rx, watcher, metrics_server, resync })
    }

    /// Runs the controller until a supervised task exits
    pub async fn run(self) -> Result<(), ControllerError> {
        let Self { operand, mut triggers, mut watcher, mut metrics_server, resync } = self;

        info!("Hyperconverged Operator running");

        // Startup pass applies the opinionated state before any events arrive
        reconcile(&operand, ReconcileRequest::controller_triggered()).await;

        let result = loop {
            tokio::select! {
                maybe_req = triggers.recv() => {
                    match maybe_req {
                        Some(req) => reconcile(&operand, req).await,
                        None => break Err(ControllerError::Watch("trigger queue closed".to_string())),
                    }
                }
                result = &mut watcher => {
                    break match result {
                        Ok(Ok(())) => Err(ControllerError::Watch("watcher exited".to_string())),
                        Ok(Err(e)) => Err(e),
                        Err(e) => Err(ControllerError::Watch(format!("watcher panicked: {}", e))),
                    };
                }
                result = &mut metrics_server => {
                    break match result {
                        Ok(Ok(())) => Err(ControllerError::Serve("metrics server exited".to_string())),
                        Ok(Err(e)) => Err(e),
                        Err(e) => Err(ControllerError::Serve(format!("metrics server panicked: {}", e))),
                    };
                }
            }
        };

        resync.abort();
        result
    }
}

async fn reconcile(operand: &GenericOperand, req: ReconcileRequest) {
    match operand.ensure(&req).await {
        Ok(result) if result.created => {
            info!("Created missing {}", operand.cr_type());
        }
        Ok(result) if result.overwritten => {
            warn!("Overwrote an out-of-band modification on {}", operand.cr_type());
        }
        Ok(result) if result.updated => {
            info!("Updated {} to opinionated values", operand.cr_type());
        }
        Ok(_) => {
            debug!("{} already up-to-date", operand.cr_type());
        }
        Err(err) => {
            error!("Failed to reconcile {}: {}", operand.cr_type(), err);
        }
    }
}

/// Reads the desired ConfigMap from a YAML manifest on disk.
///
/// `WATCH_NAMESPACE` overrides the manifest's namespace when set.
fn load_config_map(path: &str, namespace: Option<&str>) -> Result<ConfigMap, ControllerError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ControllerError::Manifest(format!("failed to read {}: {}", path, e)))?;
    let mut cm: ConfigMap = serde_yaml::from_str(&raw)
        .map_err(|e| ControllerError::Manifest(format!("failed to parse {}: {}", path, e)))?;
    if let Some(ns) = namespace {
        cm.metadata.namespace = Some(ns.to_string());
    }
    Ok(cm)
}
