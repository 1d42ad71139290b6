//! Unit tests for the ConfigMap operand hooks

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use hco_metrics::HcoMetrics;
    use k8s_openapi::api::core::v1::{ConfigMap, Secret};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use kube::api::{ApiResource, DynamicObject};

    use crate::client::ObjectKey;
    use crate::configmap::new_cm_handler;
    use crate::error::OperandError;
    use crate::hooks::{from_dynamic, to_dynamic};
    use crate::mock::MockClusterClient;
    use crate::request::ReconcileRequest;

    fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn test_cm(data: &[(&str, &str)], labels: &[(&str, &str)]) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some("test-config".to_string()),
                namespace: Some("hco".to_string()),
                labels: if labels.is_empty() { None } else { Some(string_map(labels)) },
                ..Default::default()
            },
            data: Some(string_map(data)),
            ..Default::default()
        }
    }

    fn key() -> ObjectKey {
        ObjectKey { namespace: Some("hco".to_string()), name: "test-config".to_string() }
    }

    fn new_metrics() -> Arc<HcoMetrics> {
        Arc::new(HcoMetrics::new().expect("metrics construction should not fail"))
    }

    fn seed(client: &MockClusterClient, cm: &ConfigMap) {
        client.add_object(to_dynamic(cm).expect("conversion should succeed"));
    }

    fn stored_cm(client: &MockClusterClient) -> ConfigMap {
        let obj = client.stored(&key()).expect("object should be stored");
        from_dynamic(&obj).expect("stored object should parse as a ConfigMap")
    }

    #[tokio::test]
    async fn test_missing_configmap_is_created_verbatim() {
        let client = MockClusterClient::new();
        let desired = test_cm(&[("key", "value")], &[("app", "hco")]);
        let handler = new_cm_handler(Arc::new(client.clone()), new_metrics(), desired.clone());

        let result = handler
            .ensure(&ReconcileRequest::controller_triggered())
            .await
            .expect("ensure should succeed");

        assert!(result.created);
        assert!(result.updated);
        assert!(!result.overwritten);
        assert_eq!(client.create_count(), 1);
        assert_eq!(client.update_count(), 0);

        let stored = stored_cm(&client);
        assert_eq!(stored.data, desired.data);
        assert_eq!(stored.metadata.labels, desired.metadata.labels);
    }

    #[tokio::test]
    async fn test_matching_configmap_is_left_alone_every_time() {
        let client = MockClusterClient::new();
        let desired = test_cm(&[("key", "value")], &[("app", "hco")]);
        // Observed matches on data and owned labels, plus a foreign label
        let mut observed = desired.clone();
        observed
            .metadata
            .labels
            .get_or_insert_with(BTreeMap::new)
            .insert("team".to_string(), "x".to_string());
        seed(&client, &observed);

        let handler = new_cm_handler(Arc::new(client.clone()), new_metrics(), desired);

        for _ in 0..3 {
            let result = handler
                .ensure(&ReconcileRequest::externally_triggered())
                .await
                .expect("ensure should succeed");
            assert!(!result.updated);
            assert!(!result.overwritten);
        }
        assert_eq!(client.create_count(), 0);
        assert_eq!(client.update_count(), 0, "idempotent passes must not write");
    }

    #[tokio::test]
    async fn test_drift_is_corrected_and_foreign_labels_survive() {
        let client = MockClusterClient::new();
        let metrics = new_metrics();
        let desired = test_cm(&[("key", "value")], &[("app", "hco")]);
        let observed = test_cm(&[("key", "tampered"), ("extra", "added")], &[("team", "x")]);
        seed(&client, &observed);

        let handler = new_cm_handler(Arc::new(client.clone()), metrics.clone(), desired.clone());
        let result = handler
            .ensure(&ReconcileRequest::externally_triggered())
            .await
            .expect("ensure should succeed");

        assert!(result.updated);
        assert!(result.overwritten);
        assert_eq!(client.update_count(), 1);

        let stored = stored_cm(&client);
        assert_eq!(stored.data, desired.data, "data is replaced wholesale");
        assert_eq!(
            stored.metadata.labels,
            Some(string_map(&[("app", "hco"), ("team", "x")])),
            "owned labels overwrite, foreign labels survive"
        );

        let count = metrics
            .get_overwritten_modifications_count("ConfigMap", "test-config")
            .expect("metric read should succeed");
        assert_eq!(count, 1.0);
    }

    #[tokio::test]
    async fn test_controller_triggered_correction_is_not_an_overwrite() {
        let client = MockClusterClient::new();
        let metrics = new_metrics();
        let desired = test_cm(&[("key", "value")], &[]);
        let observed = test_cm(&[("key", "old")], &[]);
        seed(&client, &observed);

        let handler = new_cm_handler(Arc::new(client.clone()), metrics.clone(), desired);
        let result = handler
            .ensure(&ReconcileRequest::controller_triggered())
            .await
            .expect("ensure should succeed");

        assert!(result.updated);
        assert!(!result.overwritten);

        let count = metrics
            .get_overwritten_modifications_count("ConfigMap", "test-config")
            .expect("metric read should succeed");
        assert_eq!(count, 0.0);
    }

    #[tokio::test]
    async fn test_label_only_drift_triggers_a_corrective_write() {
        let client = MockClusterClient::new();
        let desired = test_cm(&[("key", "value")], &[("app", "hco")]);
        // Same data, but the owned label was stripped by an external actor
        let observed = test_cm(&[("key", "value")], &[]);
        seed(&client, &observed);

        let handler = new_cm_handler(Arc::new(client.clone()), new_metrics(), desired);
        let result = handler
            .ensure(&ReconcileRequest::externally_triggered())
            .await
            .expect("ensure should succeed");

        assert!(result.updated);
        assert!(result.overwritten);
        let stored = stored_cm(&client);
        assert_eq!(
            stored.metadata.labels,
            Some(string_map(&[("app", "hco")])),
        );
    }

    #[tokio::test]
    async fn test_wrong_kind_under_the_key_is_a_type_mismatch() {
        let client = MockClusterClient::new();
        let mut wrong = DynamicObject::new("test-config", &ApiResource::erase::<Secret>(&()));
        wrong.metadata.namespace = Some("hco".to_string());
        client.add_object(wrong);

        let desired = test_cm(&[("key", "value")], &[]);
        let handler = new_cm_handler(Arc::new(client.clone()), new_metrics(), desired);

        let err = handler
            .ensure(&ReconcileRequest::controller_triggered())
            .await
            .expect_err("ensure should fail");

        assert!(matches!(err, OperandError::TypeMismatch { expected: "ConfigMap", .. }));
        assert_eq!(client.update_count(), 0);
    }
}
