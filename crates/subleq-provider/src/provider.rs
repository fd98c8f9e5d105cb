//! The subleq metric provider.
//!
//! Serves a single pod metric, `subleq-metric`. Pods are grouped into
//! applications by their `name` label, and the label value doubles as the
//! application's program text.
//!
//! A selector query (what the autoscaler issues once per sync period) steps
//! the application's program once and records how many pods matched. Per-pod
//! queries read the cached output and pod count, so however many pods are
//! asked about, the program advances once per poll.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::selector::LabelSelector;
use crate::source::{MetricSource, ResourceLister};
use crate::store::{AppSnapshot, ProgramStore};
use crate::translate::{TARGET_METRIC_VALUE, desired_pods, reported_metric_value};
use crate::types::*;

/// The metric served by this provider.
pub const SUBLEQ_METRIC_NAME: &str = "subleq-metric";

/// Pod label holding the application name (and program text).
pub const APP_LABEL: &str = "name";

/// Custom metrics provider backed by per-application subleq programs.
pub struct SubleqProvider<L> {
    lister: L,
    store: ProgramStore,
}

impl<L: ResourceLister> SubleqProvider<L> {
    pub fn new(lister: L) -> Self {
        Self::with_store(lister, ProgramStore::new())
    }

    pub fn with_store(lister: L, store: ProgramStore) -> Self {
        Self { lister, store }
    }

    pub fn store(&self) -> &ProgramStore {
        &self.store
    }

    pub fn lister(&self) -> &L {
        &self.lister
    }

    fn metric_info() -> CustomMetricInfo {
        CustomMetricInfo {
            group_resource: GroupResource::pods(),
            metric: SUBLEQ_METRIC_NAME.to_string(),
            namespaced: true,
        }
    }

    fn check_info(info: &CustomMetricInfo) -> ProviderResult<()> {
        if info.metric != SUBLEQ_METRIC_NAME || info.group_resource != GroupResource::pods() {
            return Err(ProviderError::MetricNotFound {
                resource: info.group_resource.to_string(),
                metric: info.metric.clone(),
            });
        }
        Ok(())
    }

    /// Resolve the application a pod belongs to.
    fn app_name(&self, name: &NamespacedName) -> ProviderResult<String> {
        let labels = self
            .lister
            .labels(name)?
            .ok_or_else(|| ProviderError::NotFound {
                resource: "pods".to_string(),
                namespace: name.namespace.clone(),
                name: name.name.clone(),
            })?;

        match labels.get(APP_LABEL) {
            Some(app) if !app.is_empty() => Ok(app.clone()),
            _ => Err(ProviderError::MissingAppLabel {
                namespace: name.namespace.clone(),
                name: name.name.clone(),
            }),
        }
    }

    /// Metric value for one pod from an application's state at one step.
    fn value_from_snapshot(
        app: &str,
        snapshot: &AppSnapshot,
        name: &NamespacedName,
        info: &CustomMetricInfo,
    ) -> ProviderResult<MetricValue> {
        let desired = desired_pods(snapshot.last_output);
        let value = reported_metric_value(desired, snapshot.current_pods, TARGET_METRIC_VALUE)
            .ok_or_else(|| ProviderError::NoCurrentPods {
                app: app.to_string(),
            })?;

        debug!(
            pod = %name,
            %app,
            step = snapshot.step,
            desired,
            current = snapshot.current_pods,
            value,
            "metric value"
        );

        Ok(Self::metric_for(value, name, info))
    }

    fn metric_for(value: f64, name: &NamespacedName, info: &CustomMetricInfo) -> MetricValue {
        MetricValue {
            described_object: ObjectReference::pod(name),
            metric: MetricIdentifier {
                name: info.metric.clone(),
            },
            timestamp: epoch_secs(),
            value: MilliQuantity::from_f64(value),
        }
    }
}

impl<L: ResourceLister> MetricSource for SubleqProvider<L> {
    async fn get_metric_by_name(
        &self,
        name: &NamespacedName,
        info: &CustomMetricInfo,
    ) -> ProviderResult<MetricValue> {
        Self::check_info(info)?;

        let app = self.app_name(name)?;
        let snapshot = self
            .store
            .snapshot(&app)
            .await
            .ok_or_else(|| ProviderError::NotAssociated {
                namespace: name.namespace.clone(),
                name: name.name.clone(),
            })?;

        Self::value_from_snapshot(&app, &snapshot, name, info)
    }

    async fn get_metric_by_selector(
        &self,
        namespace: &str,
        selector: &LabelSelector,
        info: &CustomMetricInfo,
    ) -> ProviderResult<MetricValueList> {
        Self::check_info(info)?;

        let names = self.lister.list_names(namespace, selector)?;
        let Some(first) = names.first() else {
            debug!(%namespace, %selector, "no pods match selector");
            return Ok(MetricValueList { items: Vec::new() });
        };

        // The application is taken from the first matching pod; the
        // selector is expected to cover a single application.
        let app = self.app_name(&NamespacedName::new(namespace, first.as_str()))?;
        let snapshot = self.store.poll(&app, names.len()).await;

        // Every pod of the polled application reports from this one step,
        // even if another poll advances the program meanwhile.
        let mut items = Vec::with_capacity(names.len());
        for pod in &names {
            let pod = NamespacedName::new(namespace, pod.as_str());
            let value = match self.app_name(&pod) {
                Ok(pod_app) if pod_app == app => {
                    Self::value_from_snapshot(&app, &snapshot, &pod, info)
                }
                Ok(_) => self.get_metric_by_name(&pod, info).await,
                Err(e) => Err(e),
            };
            match value {
                Ok(value) => items.push(value),
                Err(ProviderError::NotFound { .. }) => {
                    warn!(%pod, "pod disappeared during poll, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(MetricValueList { items })
    }

    fn list_all_metrics(&self) -> Vec<CustomMetricInfo> {
        vec![Self::metric_info()]
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
