//! Wire types for the custom metrics API.
//!
//! Shapes follow `custom.metrics.k8s.io/v1beta1` closely enough for the
//! horizontal pod autoscaler to consume them.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A namespace-scoped object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl NamespacedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// API group plus resource, e.g. `("", "pods")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    pub fn pods() -> Self {
        Self {
            group: String::new(),
            resource: "pods".to_string(),
        }
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Identifies a metric served for a kind of resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetricInfo {
    pub group_resource: GroupResource,
    pub metric: String,
    pub namespaced: bool,
}

/// Reference to the object a metric value describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub api_version: String,
}

impl ObjectReference {
    pub fn pod(name: &NamespacedName) -> Self {
        Self {
            kind: "Pod".to_string(),
            namespace: name.namespace.clone(),
            name: name.name.clone(),
            api_version: "v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricIdentifier {
    pub name: String,
}

/// A decimal quantity stored in thousandths, rendered the way Kubernetes
/// renders `resource.Quantity` (`"3"`, `"1500m"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MilliQuantity(pub i64);

impl MilliQuantity {
    /// Convert a float, truncating below one thousandth.
    pub fn from_f64(value: f64) -> Self {
        Self((value * 1000.0) as i64)
    }
}

impl fmt::Display for MilliQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{}", self.0 / 1000)
        } else {
            write!(f, "{}m", self.0)
        }
    }
}

impl Serialize for MilliQuantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One metric sample for one object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub described_object: ObjectReference,
    pub metric: MetricIdentifier,
    /// Unix timestamp (seconds) when the value was produced.
    pub timestamp: u64,
    pub value: MilliQuantity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValueList {
    pub items: Vec<MetricValue>,
}
