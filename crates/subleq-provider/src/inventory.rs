//! In-memory pod inventory.
//!
//! A [`ResourceLister`] over a fixed table of pods, loaded from the daemon
//! config and editable at runtime. Used when the adapter runs without a
//! cluster behind it, and in tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderResult;
use crate::selector::LabelSelector;
use crate::source::ResourceLister;
use crate::types::NamespacedName;

fn default_namespace() -> String {
    "default".to_string()
}

/// A pod and its labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRecord {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl PodRecord {
    pub fn new(namespace: &str, name: &str, labels: &[(&str, &str)]) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

type PodKey = (String, String);

/// Shared, mutable pod table. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    pods: Arc<RwLock<BTreeMap<PodKey, HashMap<String, String>>>>,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pods(pods: impl IntoIterator<Item = PodRecord>) -> Self {
        let inventory = Self::new();
        for pod in pods {
            inventory.upsert(pod);
        }
        inventory
    }

    /// Insert a pod or replace its labels.
    pub fn upsert(&self, pod: PodRecord) {
        debug!(namespace = %pod.namespace, name = %pod.name, "inventory upsert");
        let mut pods = self.pods.write().unwrap_or_else(|e| e.into_inner());
        pods.insert((pod.namespace, pod.name), pod.labels);
    }

    /// Remove a pod. Returns whether it existed.
    pub fn remove(&self, name: &NamespacedName) -> bool {
        let mut pods = self.pods.write().unwrap_or_else(|e| e.into_inner());
        pods.remove(&(name.namespace.clone(), name.name.clone()))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.pods.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceLister for StaticInventory {
    fn list_names(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> ProviderResult<Vec<String>> {
        let pods = self.pods.read().unwrap_or_else(|e| e.into_inner());
        Ok(pods
            .iter()
            .filter(|((ns, _), labels)| ns == namespace && selector.matches(labels))
            .map(|((_, name), _)| name.clone())
            .collect())
    }

    fn labels(&self, name: &NamespacedName) -> ProviderResult<Option<HashMap<String, String>>> {
        let pods = self.pods.read().unwrap_or_else(|e| e.into_inner());
        Ok(pods
            .get(&(name.namespace.clone(), name.name.clone()))
            .cloned())
    }
}
