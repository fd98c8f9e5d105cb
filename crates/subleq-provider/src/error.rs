//! Error types for the subleq metrics provider.

use thiserror::Error;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Lookup failures reported to the caller of a metric query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("metric {metric} not found for resource {resource}")]
    MetricNotFound { resource: String, metric: String },

    #[error("{resource} {namespace}/{name} not found")]
    NotFound {
        resource: String,
        namespace: String,
        name: String,
    },

    #[error("Pod {namespace}/{name} is missing 'name' label")]
    MissingAppLabel { namespace: String, name: String },

    #[error("Pod {namespace}/{name} has not been associated with an autoscaled resource")]
    NotAssociated { namespace: String, name: String },

    #[error("application {app} has no current pods")]
    NoCurrentPods { app: String },

    #[error("invalid label selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl ProviderError {
    /// Whether this error means the resource itself does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::MetricNotFound { .. })
    }
}
