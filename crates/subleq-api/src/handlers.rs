//! HTTP handlers.
//!
//! Each handler delegates to the provider's `MetricSource` implementation
//! and returns JSON in the custom metrics API shape.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::{debug, warn};

use subleq_provider::*;

use crate::{ApiState, GROUP_VERSION};

/// Object name that selects every object matching the label selector.
const WILDCARD: &str = "*";

/// Error envelope for failed requests.
#[derive(serde::Serialize)]
struct ApiError {
    success: bool,
    error: String,
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiError {
            success: false,
            error: msg.to_string(),
        }),
    )
}

fn status_for(err: &ProviderError) -> StatusCode {
    match err {
        ProviderError::NotFound { .. } | ProviderError::MetricNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        ProviderError::InvalidSelector { .. } | ProviderError::MissingAppLabel { .. } => {
            StatusCode::BAD_REQUEST
        }
        ProviderError::NotAssociated { .. } | ProviderError::NoCurrentPods { .. } => {
            StatusCode::CONFLICT
        }
    }
}

fn provider_error(err: &ProviderError) -> axum::response::Response {
    let status = status_for(err);
    warn!(error = %err, status = status.as_u16(), "metric query failed");
    error_response(&err.to_string(), status).into_response()
}

fn value_list(items: Vec<MetricValue>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "kind": "MetricValueList",
        "apiVersion": GROUP_VERSION,
        "metadata": {},
        "items": items,
    }))
}

// ── Discovery ──────────────────────────────────────────────────

/// GET /apis/custom.metrics.k8s.io/v1beta1
pub async fn list_metrics<L: ResourceLister + 'static>(
    State(state): State<ApiState<L>>,
) -> impl IntoResponse {
    let resources: Vec<serde_json::Value> = state
        .provider
        .list_all_metrics()
        .into_iter()
        .map(|info| {
            serde_json::json!({
                "name": format!("{}/{}", info.group_resource, info.metric),
                "singularName": "",
                "namespaced": info.namespaced,
                "kind": "MetricValueList",
                "verbs": ["get"],
            })
        })
        .collect();

    Json(serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": GROUP_VERSION,
        "resources": resources,
    }))
}

// ── Metrics ────────────────────────────────────────────────────

/// Query string for metric requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricQuery {
    pub label_selector: Option<String>,
}

/// GET /apis/custom.metrics.k8s.io/v1beta1/namespaces/:namespace/:resource/:name/:metric
///
/// `name == "*"` queries every object matching `labelSelector` and advances
/// the application's program; any other name reads the cached value.
pub async fn get_metric<L: ResourceLister + 'static>(
    State(state): State<ApiState<L>>,
    Path((namespace, resource, name, metric)): Path<(String, String, String, String)>,
    Query(query): Query<MetricQuery>,
) -> impl IntoResponse {
    let info = CustomMetricInfo {
        group_resource: GroupResource {
            group: String::new(),
            resource,
        },
        metric,
        namespaced: true,
    };

    if name == WILDCARD {
        let selector = match LabelSelector::parse(query.label_selector.as_deref().unwrap_or("")) {
            Ok(s) => s,
            Err(e) => return provider_error(&e),
        };
        debug!(%namespace, %selector, metric = %info.metric, "metric by selector");

        match state
            .provider
            .get_metric_by_selector(&namespace, &selector, &info)
            .await
        {
            Ok(list) => value_list(list.items).into_response(),
            Err(e) => provider_error(&e),
        }
    } else {
        let name = NamespacedName::new(namespace, name);
        match state.provider.get_metric_by_name(&name, &info).await {
            Ok(value) => value_list(vec![value]).into_response(),
            Err(e) => provider_error(&e),
        }
    }
}

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
pub async fn prometheus_metrics<L: ResourceLister + 'static>(
    State(state): State<ApiState<L>>,
) -> impl IntoResponse {
    let snapshots = state.provider.store().snapshots().await;
    let body = render_prometheus(&snapshots);
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
