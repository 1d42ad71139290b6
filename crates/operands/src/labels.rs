//! Label bookkeeping for managed objects.
//!
//! The operator owns the labels it puts on a desired object; any other label
//! on the observed object belongs to someone else (users, other controllers)
//! and must survive reconciliation untouched.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Copies every label of `required` onto `found`.
///
/// Owned keys overwrite; keys present only on `found` are preserved
/// unchanged.
pub fn merge_labels(required: &ObjectMeta, found: &mut ObjectMeta) {
    let Some(required_labels) = &required.labels else {
        return;
    };
    let target = found.labels.get_or_insert_with(BTreeMap::new);
    for (key, value) in required_labels {
        target.insert(key.clone(), value.clone());
    }
}

/// Returns true when every label of `required` is present on `found` with
/// the same value. Labels present only on `found` are not considered.
pub fn compare_labels(required: &ObjectMeta, found: &ObjectMeta) -> bool {
    let Some(required_labels) = &required.labels else {
        return true;
    };
    if required_labels.is_empty() {
        return true;
    }
    let Some(found_labels) = &found.labels else {
        return false;
    };
    required_labels
        .iter()
        .all(|(key, value)| found_labels.get(key) == Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_with_labels(pairs: &[(&str, &str)]) -> ObjectMeta {
        ObjectMeta {
            labels: Some(
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_preserves_foreign_labels() {
        let required = meta_with_labels(&[("app", "hco")]);
        let mut found = meta_with_labels(&[("team", "x"), ("app", "stale")]);

        merge_labels(&required, &mut found);

        let labels = found.labels.unwrap();
        assert_eq!(labels.get("app").map(String::as_str), Some("hco"));
        assert_eq!(labels.get("team").map(String::as_str), Some("x"));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_merge_into_unlabelled_object() {
        let required = meta_with_labels(&[("app", "hco")]);
        let mut found = ObjectMeta::default();

        merge_labels(&required, &mut found);

        let labels = found.labels.unwrap();
        assert_eq!(labels.get("app").map(String::as_str), Some("hco"));
    }

    #[test]
    fn test_merge_without_required_labels_is_a_no_op() {
        let required = ObjectMeta::default();
        let mut found = meta_with_labels(&[("team", "x")]);

        merge_labels(&required, &mut found);

        assert_eq!(found.labels.unwrap().len(), 1);
    }

    #[test]
    fn test_compare_ignores_foreign_labels() {
        let required = meta_with_labels(&[("app", "hco")]);
        let found = meta_with_labels(&[("app", "hco"), ("team", "x")]);
        assert!(compare_labels(&required, &found));
    }

    #[test]
    fn test_compare_detects_missing_owned_label() {
        let required = meta_with_labels(&[("app", "hco")]);
        let found = meta_with_labels(&[("team", "x")]);
        assert!(!compare_labels(&required, &found));
    }

    #[test]
    fn test_compare_detects_changed_owned_value() {
        let required = meta_with_labels(&[("app", "hco")]);
        let found = meta_with_labels(&[("app", "other")]);
        assert!(!compare_labels(&required, &found));
    }

    #[test]
    fn test_compare_with_no_required_labels_always_matches() {
        let required = ObjectMeta::default();
        let found = meta_with_labels(&[("team", "x")]);
        assert!(compare_labels(&required, &found));
    }
}
