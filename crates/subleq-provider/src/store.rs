//! Per-application program store.
//!
//! One program per application name, created on first poll and kept for
//! the lifetime of the process. The map lock is only held to find or
//! insert an entry; stepping a program holds that application's own lock,
//! so polls for different applications never wait on each other and two
//! polls for the same application never interleave.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use subleq_vm::Program;

/// Execution state owned by one application.
#[derive(Debug)]
pub struct AppState {
    pub program: Program,
    /// Pods matching the application at the last poll.
    pub current_pods: usize,
}

impl AppState {
    fn new(app: &str) -> Self {
        Self {
            program: subleq_vm::parse(app),
            current_pods: 0,
        }
    }

    fn snapshot(&self, app: &str) -> AppSnapshot {
        AppSnapshot {
            app: app.to_string(),
            step: self.program.step(),
            instruction_pointer: self.program.instruction_pointer(),
            last_output: self.program.last_output(),
            halted: self.program.is_halted(),
            current_pods: self.current_pods,
        }
    }
}

/// Point-in-time copy of an application's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    pub app: String,
    pub step: u64,
    pub instruction_pointer: i64,
    pub last_output: i64,
    pub halted: bool,
    pub current_pods: usize,
}

/// Store of per-application programs. Cheap to clone; clones share state.
///
/// Entries are never evicted, so memory grows with the number of distinct
/// application names seen.
#[derive(Debug, Clone, Default)]
pub struct ProgramStore {
    apps: Arc<RwLock<HashMap<String, Arc<Mutex<AppState>>>>>,
}

impl ProgramStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an application's state without creating it.
    pub async fn get(&self, app: &str) -> Option<Arc<Mutex<AppState>>> {
        self.apps.read().await.get(app).cloned()
    }

    /// Look up an application's state, parsing its program on first use.
    pub async fn get_or_create(&self, app: &str) -> Arc<Mutex<AppState>> {
        if let Some(state) = self.get(app).await {
            return state;
        }

        let mut apps = self.apps.write().await;
        apps.entry(app.to_string())
            .or_insert_with(|| {
                debug!(%app, "creating program for application");
                Arc::new(Mutex::new(AppState::new(app)))
            })
            .clone()
    }

    /// Record the current pod count and execute exactly one instruction.
    pub async fn poll(&self, app: &str, current_pods: usize) -> AppSnapshot {
        let state = self.get_or_create(app).await;
        let mut state = state.lock().await;

        state.current_pods = current_pods;
        let output = state.program.next_output();

        info!(
            %app,
            output,
            step = state.program.step(),
            current_pods,
            "program stepped"
        );

        state.snapshot(app)
    }

    /// Cached state for an application, without stepping it.
    pub async fn snapshot(&self, app: &str) -> Option<AppSnapshot> {
        let state = self.get(app).await?;
        let state = state.lock().await;
        Some(state.snapshot(app))
    }

    /// Cached state for every application, ordered by name.
    pub async fn snapshots(&self) -> Vec<AppSnapshot> {
        let entries: Vec<(String, Arc<Mutex<AppState>>)> = self
            .apps
            .read()
            .await
            .iter()
            .map(|(app, state)| (app.clone(), state.clone()))
            .collect();

        let mut snapshots = Vec::with_capacity(entries.len());
        for (app, state) in entries {
            snapshots.push(state.lock().await.snapshot(&app));
        }
        snapshots.sort_by(|a, b| a.app.cmp(&b.app));
        snapshots
    }

    pub async fn len(&self) -> usize {
        self.apps.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.apps.read().await.is_empty()
    }
}
