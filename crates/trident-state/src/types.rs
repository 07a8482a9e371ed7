//! Record types for the Trident record store.
//!
//! These types represent the persisted state of daemon registrations,
//! connectivity markers, plugin declarations, and plugin results. All types
//! are serializable to/from JSON for storage in redb tables, and their field
//! names are the wire format the HTTP layer returns verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique human-readable identifier for a daemon.
pub type DaemonName = String;

// ── Daemon ─────────────────────────────────────────────────────────

/// Durable registration record for a daemon.
///
/// Created once at first connect and never mutated afterwards; deleted only
/// by explicit removal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonRecord {
    pub daemon: DaemonName,
    /// Network address the daemon reported at registration.
    pub host_addr: String,
    pub worker_count: u32,
    /// Opaque configuration blob (`{logging_level, args}`), returned verbatim.
    pub arguments: Value,
}

// ── ConnectedDaemon ────────────────────────────────────────────────

/// Ephemeral connectivity marker; one row exists iff the daemon is connected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectedRecord {
    pub daemon: DaemonName,
}

// ── Plugin ─────────────────────────────────────────────────────────

/// A plugin instance declared by a daemon's configuration at registration.
///
/// Write-once: never updated, never re-created on reconnect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginRecord {
    /// Surrogate id drawn from the store's plugin sequence.
    pub plugin: u64,
    /// Plugin name, unique per daemon (not globally).
    pub plugin_name: String,
    /// The plugin's `args` configuration sub-object, if any.
    pub arguments: Option<Value>,
    pub daemon: DaemonName,
}

impl PluginRecord {
    /// Table key: `{daemon}/{plugin_name}`.
    pub fn table_key(&self) -> String {
        plugin_key(&self.daemon, &self.plugin_name)
    }
}

/// Build the PLUGINS table key for a daemon/plugin pair.
pub fn plugin_key(daemon: &str, plugin_name: &str) -> String {
    format!("{daemon}/{plugin_name}")
}

/// A plugin declaration to be stored at registration time, before a surrogate
/// id has been assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSpec {
    pub plugin_name: String,
    pub arguments: Option<Value>,
}

// ── Result ─────────────────────────────────────────────────────────

/// One indexed result payload pushed by a plugin run.
///
/// Keyed by `(plugin_name, index)`; `daemon` is a filter attribute on reads
/// and deletes. A re-push to the same key replaces the payload wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    pub index: i64,
    /// Output map from string position to value (values may be null).
    pub result: Value,
    /// Referenced plugin name; serialized as `plugin` on the wire.
    #[serde(rename = "plugin")]
    pub plugin_name: String,
    pub daemon: DaemonName,
}

impl ResultRecord {
    /// Table key: `{plugin_name}:{index}`.
    pub fn table_key(&self) -> String {
        result_key(&self.plugin_name, self.index)
    }
}

/// Build the RESULTS table key for a plugin/index pair.
pub fn result_key(plugin_name: &str, index: i64) -> String {
    format!("{plugin_name}:{index}")
}
