//! View types for dashboard template rendering.
//!
//! These types are purpose-built for Askama templates: they carry
//! precomputed counts and flags so templates stay simple.

use std::collections::HashSet;

use trident_state::{ConnectedRecord, DaemonRecord, RecordStore};

// ── Overview summary ────────────────────────────────────────────

pub struct OverviewSummary {
    pub daemon_count: usize,
    pub connected_count: usize,
    pub result_count: usize,
}

// ── Daemon rows ─────────────────────────────────────────────────

pub struct DaemonRow {
    pub daemon: String,
    pub host_addr: String,
    pub worker_count: u32,
    pub connected: bool,
    pub plugin_count: usize,
    pub result_count: usize,
}

impl DaemonRow {
    pub fn build(store: &RecordStore, record: &DaemonRecord, connected: &HashSet<String>) -> Self {
        let plugin_count = store.list_plugins(&record.daemon).map(|p| p.len()).unwrap_or(0);
        let result_count = store.list_results(&record.daemon).map(|r| r.len()).unwrap_or(0);
        Self {
            daemon: record.daemon.clone(),
            host_addr: record.host_addr.clone(),
            worker_count: record.worker_count,
            connected: connected.contains(&record.daemon),
            plugin_count,
            result_count,
        }
    }
}

/// Build the connected-name set from connectivity markers.
pub fn connected_names(markers: &[ConnectedRecord]) -> HashSet<String> {
    markers.iter().map(|m| m.daemon.clone()).collect()
}
