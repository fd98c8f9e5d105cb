//! subleq-provider — custom metrics backed by subleq programs.
//!
//! Each application (identified by its `name` label) owns one subleq
//! program, parsed from the application name itself. Every selector-based
//! poll steps that program once; the output is turned into a desired pod
//! count and then into the metric value that makes the autoscaler land on
//! exactly that count.
//!
//! # Architecture
//!
//! ```text
//! SubleqProvider<L: ResourceLister>   (implements MetricSource)
//!   ├── get_metric_by_selector() → steps the app's program once
//!   ├── get_metric_by_name()     → reads the cached output
//!   └── list_all_metrics()
//!
//! ProgramStore
//!   └── app name → Mutex<AppState { program, current_pods }>
//!
//! translate
//!   ├── desired_pods(output)              = output + 2
//!   └── reported_metric_value(d, c, t)    = d * t / c
//! ```

pub mod error;
pub mod inventory;
pub mod prometheus;
pub mod provider;
pub mod selector;
pub mod source;
pub mod store;
pub mod translate;
pub mod types;

pub use error::{ProviderError, ProviderResult};
pub use inventory::{PodRecord, StaticInventory};
pub use prometheus::render_prometheus;
pub use provider::{APP_LABEL, SUBLEQ_METRIC_NAME, SubleqProvider};
pub use selector::LabelSelector;
pub use source::{MetricSource, ResourceLister};
pub use store::{AppSnapshot, AppState, ProgramStore};
pub use translate::{TARGET_METRIC_VALUE, desired_pods, reported_metric_value};
pub use types::*;
