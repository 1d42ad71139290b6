//! Cluster client seam.
//!
//! The driver talks to the cluster through an object-safe trait so every
//! operand kind shares one client surface and unit tests can substitute an
//! in-memory mock. The production implementation wraps `kube::Api` over
//! dynamic objects, resolved per namespaced key.

use std::fmt;

use async_trait::async_trait;
use kube::api::{Api, ApiResource, DynamicObject, PostParams};
use thiserror::Error;

/// Namespaced identity used to fetch and write objects
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    /// Namespace, or `None` for the client's default namespace
    pub namespace: Option<String>,
    /// Object name
    pub name: String,
}

impl ObjectKey {
    /// Derives the key from an object's metadata; `None` when the object
    /// carries no name
    pub fn from_object(obj: &DynamicObject) -> Option<Self> {
        obj.metadata.name.as_ref().map(|name| Self {
            namespace: obj.metadata.namespace.clone(),
            name: name.clone(),
        })
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Errors surfaced by cluster get/create/update calls
#[derive(Debug, Error)]
pub enum ClientError {
    /// No object exists under the requested key
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The write lost against a concurrent update (stale resourceVersion);
    /// surfaced to the caller, never retried here
    #[error("conflict writing {0}")]
    Conflict(String),

    /// The object is structurally unusable for the requested call
    /// (e.g. a write without a name)
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// Any other Kubernetes API or transport failure
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),
}

/// Object-safe cluster access used by the reconciliation driver.
///
/// All calls are cancel-safe: dropping the returned future abandons the
/// in-flight request.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Fetches the object stored under `key`; `ClientError::NotFound` is the
    /// distinguished does-not-exist case
    async fn get(&self, key: &ObjectKey) -> Result<DynamicObject, ClientError>;

    /// Creates `obj` in the cluster
    async fn create(&self, obj: &DynamicObject) -> Result<(), ClientError>;

    /// Replaces the stored object with `obj`
    async fn update(&self, obj: &DynamicObject) -> Result<(), ClientError>;
}

/// `ClusterClient` backed by the Kubernetes API for one resource kind
pub struct KubeClusterClient {
    client: kube::Client,
    resource: ApiResource,
}

impl KubeClusterClient {
    /// Creates a client for the kind described by `resource`
    pub fn new(client: kube::Client, resource: ApiResource) -> Self {
        Self { client, resource }
    }

    fn api_for(&self, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &self.resource),
            None => Api::default_namespaced_with(self.client.clone(), &self.resource),
        }
    }
}

/// Maps Kubernetes API status codes onto the distinguished error variants
fn classify(err: kube::Error, key: &ObjectKey) -> ClientError {
    match &err {
        kube::Error::Api(resp) if resp.code == 404 => ClientError::NotFound(key.to_string()),
        kube::Error::Api(resp) if resp.code == 409 => ClientError::Conflict(key.to_string()),
        _ => ClientError::Kube(err),
    }
}

fn key_for_write(obj: &DynamicObject) -> Result<ObjectKey, ClientError> {
    ObjectKey::from_object(obj)
        .ok_or_else(|| ClientError::InvalidObject("object has no name".to_string()))
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn get(&self, key: &ObjectKey) -> Result<DynamicObject, ClientError> {
        self.api_for(key.namespace.as_deref())
            .get(&key.name)
            .await
            .map_err(|err| classify(err, key))
    }

    async fn create(&self, obj: &DynamicObject) -> Result<(), ClientError> {
        let key = key_for_write(obj)?;
        self.api_for(key.namespace.as_deref())
            .create(&PostParams::default(), obj)
            .await
            .map(|_| ())
            .map_err(|err| classify(err, &key))
    }

    async fn update(&self, obj: &DynamicObject) -> Result<(), ClientError> {
        let key = key_for_write(obj)?;
        self.api_for(key.namespace.as_deref())
            .replace(&key.name, &PostParams::default(), obj)
            .await
            .map(|_| ())
            .map_err(|err| classify(err, &key))
    }
}
