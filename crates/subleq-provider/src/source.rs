//! Capability traits at the provider boundary.

use std::collections::HashMap;
use std::future::Future;

use crate::error::ProviderResult;
use crate::selector::LabelSelector;
use crate::types::{CustomMetricInfo, MetricValue, MetricValueList, NamespacedName};

/// A source of custom metrics, as consumed by the metrics API server.
pub trait MetricSource: Send + Sync {
    /// Metric value for a single named object.
    fn get_metric_by_name(
        &self,
        name: &NamespacedName,
        info: &CustomMetricInfo,
    ) -> impl Future<Output = ProviderResult<MetricValue>> + Send;

    /// Metric values for every object in `namespace` matching `selector`.
    fn get_metric_by_selector(
        &self,
        namespace: &str,
        selector: &LabelSelector,
        info: &CustomMetricInfo,
    ) -> impl Future<Output = ProviderResult<MetricValueList>> + Send;

    /// Every metric this source can serve.
    fn list_all_metrics(&self) -> Vec<CustomMetricInfo>;
}

/// Resolves objects and their labels. Stands in for the Kubernetes API.
pub trait ResourceLister: Send + Sync {
    /// Names of objects in `namespace` whose labels match `selector`,
    /// in a stable order.
    fn list_names(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> ProviderResult<Vec<String>>;

    /// Labels of a single object, or `None` if it does not exist.
    fn labels(&self, name: &NamespacedName) -> ProviderResult<Option<HashMap<String, String>>>;
}
