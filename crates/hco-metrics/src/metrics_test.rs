//! Unit tests for the metrics registry

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::error::MetricsError;
    use crate::metrics::{HcoMetrics, COUNTER_LABEL_COMP_NAME};

    fn new_metrics() -> HcoMetrics {
        HcoMetrics::new().expect("registry construction should not fail")
    }

    #[test]
    fn test_inc_metric_increments_only_the_given_label_combination() {
        let metrics = new_metrics();
        let foo = HashMap::from([(COUNTER_LABEL_COMP_NAME, "configmap/foo")]);
        let bar = HashMap::from([(COUNTER_LABEL_COMP_NAME, "configmap/bar")]);

        metrics
            .inc_metric("overwrittenModifications", &foo)
            .expect("inc should succeed");

        let foo_count = metrics
            .get_metric_value("overwrittenModifications", &foo)
            .expect("get should succeed");
        let bar_count = metrics
            .get_metric_value("overwrittenModifications", &bar)
            .expect("get should succeed");
        assert_eq!(foo_count, 1.0, "incremented label combination should be 1");
        assert_eq!(bar_count, 0.0, "unrelated label combination should be untouched");
    }

    #[test]
    fn test_inc_metric_unknown_name_is_an_error_and_leaves_values_unchanged() {
        let metrics = new_metrics();
        let labels = HashMap::from([(COUNTER_LABEL_COMP_NAME, "configmap/foo")]);

        let err = metrics
            .inc_metric("doesNotExist", &labels)
            .expect_err("unknown metric name should fail");
        assert!(matches!(err, MetricsError::UnknownMetricName(_)));

        let count = metrics
            .get_metric_value("overwrittenModifications", &labels)
            .expect("get should succeed");
        assert_eq!(count, 0.0, "registered metrics should be unchanged");
    }

    #[test]
    fn test_inc_metric_on_singleton_gauge_is_a_type_error() {
        let metrics = new_metrics();
        let err = metrics
            .inc_metric("nmoInUse", &HashMap::new())
            .expect_err("incrementing a singleton gauge should fail");
        assert!(matches!(err, MetricsError::UnknownMetricType(_)));
    }

    #[test]
    fn test_set_metric_on_counter_is_a_type_error() {
        let metrics = new_metrics();
        let labels = HashMap::from([(COUNTER_LABEL_COMP_NAME, "configmap/foo")]);
        let err = metrics
            .set_metric("overwrittenModifications", &labels, 5.0)
            .expect_err("setting a counter should fail");
        assert!(matches!(err, MetricsError::UnknownMetricType(_)));
    }

    #[test]
    fn test_overwritten_modifications_labels_are_lower_cased() {
        let metrics = new_metrics();
        metrics
            .inc_overwritten_modifications("ConfigMap", "Foo")
            .expect("inc should succeed");

        // The convenience getter applies the same lower-casing
        let count = metrics
            .get_overwritten_modifications_count("configmap", "foo")
            .expect("get should succeed");
        assert_eq!(count, 1.0);

        // And the raw label value is the lower-cased kind/name pair
        let labels = HashMap::from([(COUNTER_LABEL_COMP_NAME, "configmap/foo")]);
        let raw = metrics
            .get_metric_value("overwrittenModifications", &labels)
            .expect("get should succeed");
        assert_eq!(raw, 1.0);
    }

    #[test]
    fn test_unsafe_modification_gauge_set_and_get() {
        let metrics = new_metrics();
        metrics
            .set_unsafe_modification_count(3, "kubevirt.kubevirt.io/jsonpatch")
            .expect("set should succeed");
        let count = metrics
            .get_unsafe_modifications_count("kubevirt.kubevirt.io/jsonpatch")
            .expect("get should succeed");
        assert_eq!(count, 3.0);

        // A gauge can go back down
        metrics
            .set_unsafe_modification_count(0, "kubevirt.kubevirt.io/jsonpatch")
            .expect("set should succeed");
        let count = metrics
            .get_unsafe_modifications_count("kubevirt.kubevirt.io/jsonpatch")
            .expect("get should succeed");
        assert_eq!(count, 0.0);
    }

    #[test]
    fn test_nmo_in_use_gauge_round_trip() {
        let metrics = new_metrics();

        metrics.set_nmo_in_use_gauge().expect("set should succeed");
        assert!(metrics.is_nmo_in_use().expect("get should succeed"));

        metrics.set_nmo_not_in_use_gauge().expect("set should succeed");
        assert!(!metrics.is_nmo_in_use().expect("get should succeed"));
    }

    #[test]
    fn test_metric_descriptions_cover_every_registered_metric() {
        let metrics = new_metrics();
        let descs = metrics.metric_descriptions();
        assert_eq!(descs.len(), 3);

        let fq_names: Vec<&str> = descs.iter().map(|d| d.fq_name).collect();
        assert!(fq_names.contains(&"kubevirt_hco_out_of_band_modifications_count"));
        assert!(fq_names.contains(&"kubevirt_hco_unsafe_modification_count"));
        assert!(fq_names.contains(&"kubevirt_hco_nmo_in_use"));
    }

    #[test]
    fn test_gather_exposes_registered_families() {
        use prometheus::{Encoder, TextEncoder};

        let metrics = new_metrics();
        metrics
            .inc_overwritten_modifications("ConfigMap", "foo")
            .expect("inc should succeed");

        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&metrics.gather(), &mut buf)
            .expect("encode should succeed");
        let exposition = String::from_utf8(buf).expect("exposition should be utf-8");
        assert!(exposition.contains("kubevirt_hco_out_of_band_modifications_count"));
        assert!(exposition.contains(r#"component_name="configmap/foo""#));
    }
}
