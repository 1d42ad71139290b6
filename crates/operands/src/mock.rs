//! Mock cluster client for unit testing.
//!
//! Stores objects in memory keyed by `ObjectKey`, counts calls per verb, and
//! can be primed to fail the next call of each verb. No running cluster is
//! required.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kube::api::DynamicObject;

use crate::client::{ClientError, ClusterClient, ObjectKey};

/// In-memory `ClusterClient` for tests
#[derive(Clone, Default)]
pub struct MockClusterClient {
    objects: Arc<Mutex<HashMap<ObjectKey, DynamicObject>>>,
    get_calls: Arc<Mutex<u64>>,
    create_calls: Arc<Mutex<u64>>,
    update_calls: Arc<Mutex<u64>>,
    next_get_error: Arc<Mutex<Option<ClientError>>>,
    next_create_error: Arc<Mutex<Option<ClientError>>>,
    next_update_error: Arc<Mutex<Option<ClientError>>>,
}

impl MockClusterClient {
    /// Creates an empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an object (for test setup)
    pub fn add_object(&self, obj: DynamicObject) {
        if let Some(key) = ObjectKey::from_object(&obj) {
            self.objects.lock().unwrap().insert(key, obj);
        }
    }

    /// Current stored copy of the object under `key`
    pub fn stored(&self, key: &ObjectKey) -> Option<DynamicObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// Number of get calls issued so far
    pub fn get_count(&self) -> u64 {
        *self.get_calls.lock().unwrap()
    }

    /// Number of create calls issued so far
    pub fn create_count(&self) -> u64 {
        *self.create_calls.lock().unwrap()
    }

    /// Number of update calls issued so far
    pub fn update_count(&self) -> u64 {
        *self.update_calls.lock().unwrap()
    }

    /// Makes the next get call fail with `err`
    pub fn fail_next_get(&self, err: ClientError) {
        *self.next_get_error.lock().unwrap() = Some(err);
    }

    /// Makes the next create call fail with `err`
    pub fn fail_next_create(&self, err: ClientError) {
        *self.next_create_error.lock().unwrap() = Some(err);
    }

    /// Makes the next update call fail with `err`
    pub fn fail_next_update(&self, err: ClientError) {
        *self.next_update_error.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl ClusterClient for MockClusterClient {
    async fn get(&self, key: &ObjectKey) -> Result<DynamicObject, ClientError> {
        *self.get_calls.lock().unwrap() += 1;
        if let Some(err) = self.next_get_error.lock().unwrap().take() {
            return Err(err);
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(key.to_string()))
    }

    async fn create(&self, obj: &DynamicObject) -> Result<(), ClientError> {
        *self.create_calls.lock().unwrap() += 1;
        if let Some(err) = self.next_create_error.lock().unwrap().take() {
            return Err(err);
        }
        let key = ObjectKey::from_object(obj)
            .ok_or_else(|| ClientError::InvalidObject("object has no name".to_string()))?;
        self.objects.lock().unwrap().insert(key, obj.clone());
        Ok(())
    }

    async fn update(&self, obj: &DynamicObject) -> Result<(), ClientError> {
        *self.update_calls.lock().unwrap() += 1;
        if let Some(err) = self.next_update_error.lock().unwrap().take() {
            return Err(err);
        }
        let key = ObjectKey::from_object(obj)
            .ok_or_else(|| ClientError::InvalidObject("object has no name".to_string()))?;
        let mut objects = self.objects.lock().unwrap();
        if !objects.contains_key(&key) {
            return Err(ClientError::NotFound(key.to_string()));
        }
        objects.insert(key, obj.clone());
        Ok(())
    }
}
