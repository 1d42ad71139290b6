//! Operator metrics registry.
//!
//! All metrics are declared in a fixed descriptor table and registered
//! eagerly when the registry is constructed. Callers address a metric by its
//! registry key (e.g. `"overwrittenModifications"`); the fully-qualified
//! Prometheus name is what monitoring systems scrape and must stay stable.

use std::collections::HashMap;

use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Gauge, GaugeVec, Opts, Registry};

use crate::error::MetricsError;

/// Label dimension carrying the lower-cased `<kind>/<name>` of a managed component
pub const COUNTER_LABEL_COMP_NAME: &str = "component_name";

/// Label dimension carrying the lower-cased unsafe-annotation name
pub const COUNTER_LABEL_ANN_NAME: &str = "annotation_name";

/// Gauge value meaning the integrated Node Maintenance Operator is in use
pub const NMO_IN_USE: f64 = 1.0;

/// Gauge value meaning the integrated Node Maintenance Operator is not in use
pub const NMO_NOT_IN_USE: f64 = 0.0;

/// The collector shape a descriptor produces
#[derive(Debug, Clone, Copy)]
enum MetricKind {
    /// Label-scoped monotonic counter
    CounterVec,
    /// Label-scoped gauge
    GaugeVec,
    /// Dimensionless gauge
    Gauge,
}

/// Static description of one registered metric
struct MetricDesc {
    /// Registry key used by callers
    name: &'static str,
    /// Fully-qualified Prometheus metric name (stable, scraped externally)
    fq_name: &'static str,
    /// Help text exported alongside the metric
    help: &'static str,
    /// Constant label dimensions, empty for singleton collectors
    const_labels: &'static [&'static str],
    kind: MetricKind,
}

const METRIC_DESCS: &[MetricDesc] = &[
    MetricDesc {
        name: "overwrittenModifications",
        fq_name: "kubevirt_hco_out_of_band_modifications_count",
        help: "Count of out-of-band modifications overwritten by HCO",
        const_labels: &[COUNTER_LABEL_COMP_NAME],
        kind: MetricKind::CounterVec,
    },
    MetricDesc {
        name: "unsafeModifications",
        fq_name: "kubevirt_hco_unsafe_modification_count",
        help: "Count of unsafe modifications in the HyperConverged annotations",
        const_labels: &[COUNTER_LABEL_ANN_NAME],
        kind: MetricKind::GaugeVec,
    },
    MetricDesc {
        name: "nmoInUse",
        fq_name: "kubevirt_hco_nmo_in_use",
        help: "Indicates whether integrated Node Maintenance Operator is being used (1) or not (0)",
        const_labels: &[],
        kind: MetricKind::Gauge,
    },
];

impl MetricDesc {
    fn build(&self) -> Result<MetricCollector, prometheus::Error> {
        let opts = Opts::new(self.fq_name, self.help);
        match self.kind {
            MetricKind::CounterVec => {
                Ok(MetricCollector::CounterVec(CounterVec::new(opts, self.const_labels)?))
            }
            MetricKind::GaugeVec => {
                Ok(MetricCollector::GaugeVec(GaugeVec::new(opts, self.const_labels)?))
            }
            MetricKind::Gauge => Ok(MetricCollector::Gauge(Gauge::with_opts(opts)?)),
        }
    }
}

/// A registered collector, tagged by shape
enum MetricCollector {
    CounterVec(CounterVec),
    GaugeVec(GaugeVec),
    Gauge(Gauge),
}

/// Name and help text of a registered metric, for documentation tooling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescription {
    /// Fully-qualified Prometheus metric name
    pub fq_name: &'static str,
    /// Help text
    pub help: &'static str,
}

/// Registry of all operator metrics.
///
/// Constructed once at process start and shared via `Arc`; the underlying
/// Prometheus collectors are internally synchronized, so concurrent
/// reconciliation passes can increment and read without external locking.
pub struct HcoMetrics {
    registry: Registry,
    collectors: HashMap<&'static str, MetricCollector>,
}

impl HcoMetrics {
    /// Builds the registry and registers every descriptor.
    ///
    /// Registration is eager and total: all metrics exist (at zero) from the
    /// moment this returns, whether or not they are ever touched.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let mut collectors = HashMap::with_capacity(METRIC_DESCS.len());
        for desc in METRIC_DESCS {
            let collector = desc.build()?;
            match &collector {
                MetricCollector::CounterVec(c) => registry.register(Box::new(c.clone()))?,
                MetricCollector::GaugeVec(g) => registry.register(Box::new(g.clone()))?,
                MetricCollector::Gauge(g) => registry.register(Box::new(g.clone()))?,
            }
            collectors.insert(desc.name, collector);
        }
        Ok(Self { registry, collectors })
    }

    /// Increments a label-scoped counter or gauge by 1.
    pub fn inc_metric(
        &self,
        metric_name: &str,
        labels: &HashMap<&str, &str>,
    ) -> Result<(), MetricsError> {
        match self.collectors.get(metric_name) {
            None => Err(MetricsError::UnknownMetricName(metric_name.to_string())),
            Some(MetricCollector::CounterVec(vec)) => {
                vec.get_metric_with(labels)?.inc();
                Ok(())
            }
            Some(MetricCollector::GaugeVec(vec)) => {
                vec.get_metric_with(labels)?.inc();
                Ok(())
            }
            Some(MetricCollector::Gauge(_)) => {
                Err(MetricsError::UnknownMetricType(metric_name.to_string()))
            }
        }
    }

    /// Sets a label-scoped or singleton gauge to `value`.
    pub fn set_metric(
        &self,
        metric_name: &str,
        labels: &HashMap<&str, &str>,
        value: f64,
    ) -> Result<(), MetricsError> {
        match self.collectors.get(metric_name) {
            None => Err(MetricsError::UnknownMetricName(metric_name.to_string())),
            Some(MetricCollector::GaugeVec(vec)) => {
                vec.get_metric_with(labels)?.set(value);
                Ok(())
            }
            Some(MetricCollector::Gauge(gauge)) => {
                gauge.set(value);
                Ok(())
            }
            Some(MetricCollector::CounterVec(_)) => {
                Err(MetricsError::UnknownMetricType(metric_name.to_string()))
            }
        }
    }

    /// Reads the current value of any registered collector.
    ///
    /// Labels are ignored for singleton gauges. Reading a label combination
    /// that was never written returns 0.
    pub fn get_metric_value(
        &self,
        metric_name: &str,
        labels: &HashMap<&str, &str>,
    ) -> Result<f64, MetricsError> {
        match self.collectors.get(metric_name) {
            None => Err(MetricsError::UnknownMetricName(metric_name.to_string())),
            Some(MetricCollector::CounterVec(vec)) => Ok(vec.get_metric_with(labels)?.get()),
            Some(MetricCollector::GaugeVec(vec)) => Ok(vec.get_metric_with(labels)?.get()),
            Some(MetricCollector::Gauge(gauge)) => Ok(gauge.get()),
        }
    }

    /// Increments the out-of-band modification counter for `<kind>/<name>` by 1
    pub fn inc_overwritten_modifications(&self, kind: &str, name: &str) -> Result<(), MetricsError> {
        let component = labels_for_obj(kind, name);
        let labels = HashMap::from([(COUNTER_LABEL_COMP_NAME, component.as_str())]);
        self.inc_metric("overwrittenModifications", &labels)
    }

    /// Returns the current out-of-band modification count for `<kind>/<name>`.
    /// If the result is an error the value is undefined.
    pub fn get_overwritten_modifications_count(
        &self,
        kind: &str,
        name: &str,
    ) -> Result<f64, MetricsError> {
        let component = labels_for_obj(kind, name);
        let labels = HashMap::from([(COUNTER_LABEL_COMP_NAME, component.as_str())]);
        self.get_metric_value("overwrittenModifications", &labels)
    }

    /// Sets the unsafe-modification gauge for the given annotation
    pub fn set_unsafe_modification_count(
        &self,
        count: usize,
        unsafe_annotation: &str,
    ) -> Result<(), MetricsError> {
        let annotation = unsafe_annotation.to_lowercase();
        let labels = HashMap::from([(COUNTER_LABEL_ANN_NAME, annotation.as_str())]);
        self.set_metric("unsafeModifications", &labels, count as f64)
    }

    /// Returns the current unsafe-modification count for the given annotation.
    /// If the result is an error the value is undefined.
    pub fn get_unsafe_modifications_count(
        &self,
        unsafe_annotation: &str,
    ) -> Result<f64, MetricsError> {
        let annotation = unsafe_annotation.to_lowercase();
        let labels = HashMap::from([(COUNTER_LABEL_ANN_NAME, annotation.as_str())]);
        self.get_metric_value("unsafeModifications", &labels)
    }

    /// Marks the integrated Node Maintenance Operator as in use
    pub fn set_nmo_in_use_gauge(&self) -> Result<(), MetricsError> {
        self.set_metric("nmoInUse", &HashMap::new(), NMO_IN_USE)
    }

    /// Marks the integrated Node Maintenance Operator as not in use
    pub fn set_nmo_not_in_use_gauge(&self) -> Result<(), MetricsError> {
        self.set_metric("nmoInUse", &HashMap::new(), NMO_NOT_IN_USE)
    }

    /// Returns whether the integrated Node Maintenance Operator is in use.
    /// If the result is an error the value is undefined.
    pub fn is_nmo_in_use(&self) -> Result<bool, MetricsError> {
        let val = self.get_metric_value("nmoInUse", &HashMap::new())?;
        Ok(val == NMO_IN_USE)
    }

    /// Name and help text of every registered metric
    pub fn metric_descriptions(&self) -> Vec<MetricDescription> {
        METRIC_DESCS
            .iter()
            .map(|md| MetricDescription { fq_name: md.fq_name, help: md.help })
            .collect()
    }

    /// Snapshot of all metric families, for text exposition
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

/// Builds the `component_name` label value for a managed object
fn labels_for_obj(kind: &str, name: &str) -> String {
    format!("{kind}/{name}").to_lowercase()
}
