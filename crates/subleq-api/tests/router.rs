//! Router-level tests.
//!
//! Drives the full axum router the way the autoscaler would: a selector
//! poll per sync period, followed by per-pod reads.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use subleq_api::build_router;
use subleq_provider::*;

const HI: &str = "9x-1x3x10x-1x6x0x0x-1x72x105x0";
const BASE: &str = "/apis/custom.metrics.k8s.io/v1beta1";

fn test_provider() -> Arc<SubleqProvider<StaticInventory>> {
    let inventory = StaticInventory::from_pods([
        PodRecord::new("default", "hi-0", &[("name", HI), ("role", "hi")]),
        PodRecord::new("default", "hi-1", &[("name", HI), ("role", "hi")]),
    ]);
    Arc::new(SubleqProvider::new(inventory))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn discovery_lists_subleq_metric() {
    let router = build_router(test_provider());

    let resp = router.oneshot(get(BASE)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json(resp).await;
    assert_eq!(body["groupVersion"], "custom.metrics.k8s.io/v1beta1");
    assert_eq!(body["resources"][0]["name"], "pods/subleq-metric");
    assert_eq!(body["resources"][0]["namespaced"], true);
}

#[tokio::test]
async fn selector_poll_reports_every_pod() {
    let router = build_router(test_provider());

    let uri = format!("{BASE}/namespaces/default/pods/*/subleq-metric?labelSelector=role%3Dhi");
    let resp = router.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json(resp).await;
    assert_eq!(body["kind"], "MetricValueList");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    // 'H' (72) → 74 desired pods over 2 current → 37 per pod.
    assert_eq!(items[0]["value"], "37");
    assert_eq!(items[0]["describedObject"]["name"], "hi-0");
    assert_eq!(items[1]["describedObject"]["name"], "hi-1");
}

#[tokio::test]
async fn program_advances_once_per_poll() {
    let provider = test_provider();
    let router = build_router(provider.clone());
    let poll = format!("{BASE}/namespaces/default/pods/*/subleq-metric?labelSelector=role%3Dhi");
    let read = format!("{BASE}/namespaces/default/pods/hi-1/subleq-metric");

    let mut values = Vec::new();
    for _ in 0..4 {
        let resp = router.clone().oneshot(get(&poll)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // Extra per-pod reads never advance the program.
        for _ in 0..3 {
            let resp = router.clone().oneshot(get(&read)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = router.clone().oneshot(get(&read)).await.unwrap();
        let body = json(resp).await;
        values.push(body["items"][0]["value"].as_str().unwrap().to_string());
    }

    // Outputs 72, 105, 0, -1 → 74, 107, 2, 1 desired over 2 pods.
    assert_eq!(values, vec!["37", "53500m", "1", "500m"]);
    assert_eq!(provider.store().snapshot(HI).await.unwrap().step, 3);
}

#[tokio::test]
async fn per_pod_read_before_poll_conflicts() {
    let router = build_router(test_provider());

    let uri = format!("{BASE}/namespaces/default/pods/hi-0/subleq-metric");
    let resp = router.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body = json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("has not been associated")
    );
}

#[tokio::test]
async fn unknown_metric_is_not_found() {
    let router = build_router(test_provider());

    let uri = format!("{BASE}/namespaces/default/pods/*/cpu-usage?labelSelector=role%3Dhi");
    let resp = router.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let uri = format!("{BASE}/namespaces/default/services/*/subleq-metric");
    let resp = router.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn prometheus_reflects_polls() {
    let provider = test_provider();
    let router = build_router(provider);

    let poll = format!("{BASE}/namespaces/default/pods/*/subleq-metric?labelSelector=role%3Dhi");
    let resp = router.clone().oneshot(get(&poll)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains(&format!("subleq_program_steps_total{{app=\"{HI}\"}} 1")));
    assert!(text.contains(&format!("subleq_current_pods{{app=\"{HI}\"}} 2")));
}

#[tokio::test]
async fn healthz_ok() {
    let router = build_router(test_provider());
    let resp = router.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
