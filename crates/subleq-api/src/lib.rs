//! subleq-api — HTTP surface of the subleq metrics adapter.
//!
//! Serves the read side of the custom metrics API that the horizontal pod
//! autoscaler queries, plus Prometheus exposition of program state.
//!
//! # API Routes
//!
//! Paths under `{base}` are relative to `/apis/custom.metrics.k8s.io/v1beta1`.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `{base}` | List served metrics |
//! | GET | `{base}/namespaces/:ns/:resource/:name/:metric` | Metric for one object |
//! | GET | `{base}/namespaces/:ns/:resource/*/:metric?labelSelector=` | Every matching object |
//! | GET | `/metrics` | Prometheus exposition |
//! | GET | `/healthz` | Liveness |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use subleq_provider::{ResourceLister, SubleqProvider};

/// API group/version served by this adapter.
pub const GROUP_VERSION: &str = "custom.metrics.k8s.io/v1beta1";

/// Shared state for API handlers.
pub struct ApiState<L> {
    pub provider: Arc<SubleqProvider<L>>,
}

impl<L> Clone for ApiState<L> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

/// Build the complete API router (custom metrics + Prometheus + health).
pub fn build_router<L>(provider: Arc<SubleqProvider<L>>) -> Router
where
    L: ResourceLister + 'static,
{
    let state = ApiState { provider };

    let metrics_api = Router::new()
        .route("/apis/custom.metrics.k8s.io/v1beta1", get(handlers::list_metrics::<L>))
        .route(
            "/apis/custom.metrics.k8s.io/v1beta1/namespaces/{namespace}/{resource}/{name}/{metric}",
            get(handlers::get_metric::<L>),
        )
        .route("/metrics", get(handlers::prometheus_metrics::<L>))
        .with_state(state);

    metrics_api.route("/healthz", get(handlers::healthz))
}
