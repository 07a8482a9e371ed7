//! RecordStore — redb-backed record persistence for the Trident dashboard.
//!
//! Provides typed CRUD operations over daemons, connectivity markers,
//! plugins, and results. All values are JSON-serialized into redb's `&[u8]`
//! value columns. The store supports both on-disk and in-memory backends
//! (the latter for testing).
//!
//! Multi-row mutations (daemon registration, daemon removal, bulk result
//! deletes) run inside a single write transaction, so either every row of
//! the batch commits or none does. redb serializes write transactions, which
//! is what enforces daemon-name uniqueness under concurrent registration.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe record store backed by redb.
#[derive(Clone)]
pub struct RecordStore {
    db: Arc<Database>,
}

impl RecordStore {
    /// Open (or create) a persistent record store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "record store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory record store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory record store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(DAEMONS).map_err(map_err!(Table))?;
        txn.open_table(CONNECTED).map_err(map_err!(Table))?;
        txn.open_table(PLUGINS).map_err(map_err!(Table))?;
        txn.open_table(RESULTS).map_err(map_err!(Table))?;
        txn.open_table(META).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Daemons ────────────────────────────────────────────────────

    /// Register a daemon: insert the Daemon row, one Plugin row per declared
    /// plugin, and the ConnectedDaemon marker, all in one write transaction.
    ///
    /// Fails with `Conflict` if a daemon with the same name already exists;
    /// nothing is persisted in that case.
    pub fn register_daemon(
        &self,
        record: &DaemonRecord,
        plugins: &[PluginSpec],
    ) -> StateResult<()> {
        let value = serde_json::to_vec(record).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut daemons = txn.open_table(DAEMONS).map_err(map_err!(Table))?;
            if daemons
                .get(record.daemon.as_str())
                .map_err(map_err!(Read))?
                .is_some()
            {
                // Dropping the uncommitted transaction rolls everything back.
                return Err(StateError::Conflict(format!(
                    "daemon '{}' already registered",
                    record.daemon
                )));
            }
            daemons
                .insert(record.daemon.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;

            let mut meta = txn.open_table(META).map_err(map_err!(Table))?;
            let mut next_id = meta
                .get(NEXT_PLUGIN_ID)
                .map_err(map_err!(Read))?
                .map(|guard| guard.value())
                .unwrap_or(1);

            let mut table = txn.open_table(PLUGINS).map_err(map_err!(Table))?;
            for spec in plugins {
                let plugin = PluginRecord {
                    plugin: next_id,
                    plugin_name: spec.plugin_name.clone(),
                    arguments: spec.arguments.clone(),
                    daemon: record.daemon.clone(),
                };
                next_id += 1;
                let value = serde_json::to_vec(&plugin).map_err(map_err!(Serialize))?;
                table
                    .insert(plugin.table_key().as_str(), value.as_slice())
                    .map_err(map_err!(Write))?;
            }
            meta.insert(NEXT_PLUGIN_ID, next_id)
                .map_err(map_err!(Write))?;

            let marker = ConnectedRecord {
                daemon: record.daemon.clone(),
            };
            let value = serde_json::to_vec(&marker).map_err(map_err!(Serialize))?;
            let mut connected = txn.open_table(CONNECTED).map_err(map_err!(Table))?;
            connected
                .insert(record.daemon.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(daemon = %record.daemon, plugins = plugins.len(), "daemon registered");
        Ok(())
    }

    /// Get a daemon registration by name.
    pub fn get_daemon(&self, daemon: &str) -> StateResult<Option<DaemonRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DAEMONS).map_err(map_err!(Table))?;
        match table.get(daemon).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: DaemonRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// List all daemon registrations.
    pub fn list_daemons(&self) -> StateResult<Vec<DaemonRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DAEMONS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: DaemonRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(record);
        }
        Ok(results)
    }

    /// Delete a daemon registration and its connectivity marker in one
    /// transaction. Succeeds whether or not either row exists.
    pub fn remove_daemon(&self, daemon: &str) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut daemons = txn.open_table(DAEMONS).map_err(map_err!(Table))?;
            daemons.remove(daemon).map_err(map_err!(Write))?;
            let mut connected = txn.open_table(CONNECTED).map_err(map_err!(Table))?;
            connected.remove(daemon).map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%daemon, "daemon removed");
        Ok(())
    }

    // ── Connectivity ───────────────────────────────────────────────

    /// Insert the connectivity marker for an already-registered daemon.
    ///
    /// Fails with `Conflict` if the marker is already present (a daemon
    /// cannot connect twice without disconnecting).
    pub fn mark_connected(&self, daemon: &str) -> StateResult<()> {
        let marker = ConnectedRecord {
            daemon: daemon.to_string(),
        };
        let value = serde_json::to_vec(&marker).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(CONNECTED).map_err(map_err!(Table))?;
            if table.get(daemon).map_err(map_err!(Read))?.is_some() {
                return Err(StateError::Conflict(format!(
                    "daemon '{daemon}' already connected"
                )));
            }
            table
                .insert(daemon, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%daemon, "daemon marked connected");
        Ok(())
    }

    /// Remove the connectivity marker. Returns true if it existed.
    pub fn mark_disconnected(&self, daemon: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(CONNECTED).map_err(map_err!(Table))?;
            existed = table.remove(daemon).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%daemon, existed, "daemon marked disconnected");
        Ok(existed)
    }

    /// List all connectivity markers.
    pub fn list_connected(&self) -> StateResult<Vec<ConnectedRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CONNECTED).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: ConnectedRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(record);
        }
        Ok(results)
    }

    // ── Plugins ────────────────────────────────────────────────────

    /// List all plugins declared by a daemon.
    pub fn list_plugins(&self, daemon: &str) -> StateResult<Vec<PluginRecord>> {
        let prefix = format!("{daemon}/");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PLUGINS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let record: PluginRecord =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(record);
            }
        }
        Ok(results)
    }

    /// Get one plugin by daemon and plugin name.
    pub fn get_plugin(&self, daemon: &str, plugin_name: &str) -> StateResult<Option<PluginRecord>> {
        let key = plugin_key(daemon, plugin_name);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PLUGINS).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: PluginRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    // ── Results ────────────────────────────────────────────────────

    /// Insert or replace a result row keyed by `(plugin_name, index)`.
    pub fn put_result(&self, record: &ResultRecord) -> StateResult<()> {
        let key = record.table_key();
        let value = serde_json::to_vec(record).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(RESULTS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, daemon = %record.daemon, "result stored");
        Ok(())
    }

    /// Get the result at an exact (daemon, plugin, index) coordinate.
    pub fn get_result(
        &self,
        daemon: &str,
        plugin_name: &str,
        index: i64,
    ) -> StateResult<Option<ResultRecord>> {
        let key = result_key(plugin_name, index);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(RESULTS).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: ResultRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok((record.daemon == daemon).then_some(record))
            }
            None => Ok(None),
        }
    }

    /// List all results for a daemon, across all plugins and indices.
    pub fn list_results(&self, daemon: &str) -> StateResult<Vec<ResultRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(RESULTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: ResultRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            if record.daemon == daemon {
                results.push(record);
            }
        }
        Ok(results)
    }

    /// List all results for one plugin of a daemon.
    ///
    /// Matches on the stored plugin name rather than the key prefix: a key
    /// prefix of `{plugin_name}:` would also match plugins whose names merely
    /// start with `{plugin_name}:`.
    pub fn list_results_for_plugin(
        &self,
        daemon: &str,
        plugin_name: &str,
    ) -> StateResult<Vec<ResultRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(RESULTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: ResultRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            if record.daemon == daemon && record.plugin_name == plugin_name {
                results.push(record);
            }
        }
        Ok(results)
    }

    /// Delete every result for a daemon. Returns the number deleted.
    pub fn delete_results(&self, daemon: &str) -> StateResult<u32> {
        let keys = self.collect_result_keys(|record| record.daemon == daemon)?;
        self.delete_result_keys(&keys)
    }

    /// Delete every result for one plugin of a daemon. Returns the number deleted.
    pub fn delete_results_for_plugin(&self, daemon: &str, plugin_name: &str) -> StateResult<u32> {
        let keys = self
            .collect_result_keys(|record| record.daemon == daemon && record.plugin_name == plugin_name)?;
        self.delete_result_keys(&keys)
    }

    /// Delete the single result at (daemon, plugin, index). Returns true if
    /// a matching row existed.
    pub fn delete_result(&self, daemon: &str, plugin_name: &str, index: i64) -> StateResult<bool> {
        // The key alone is not enough: the row must also belong to the daemon.
        if self.get_result(daemon, plugin_name, index)?.is_none() {
            return Ok(false);
        }
        let key = result_key(plugin_name, index);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(RESULTS).map_err(map_err!(Table))?;
            existed = table.remove(key.as_str()).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "result deleted");
        Ok(existed)
    }

    /// Collect result table keys matching a record predicate in a read
    /// transaction, for deletion in a subsequent write transaction.
    fn collect_result_keys<F>(&self, matches: F) -> StateResult<Vec<String>>
    where
        F: Fn(&ResultRecord) -> bool,
    {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(RESULTS).map_err(map_err!(Table))?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            let record: ResultRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            if matches(&record) {
                keys.push(key.value().to_string());
            }
        }
        Ok(keys)
    }

    /// Delete the given result keys in one write transaction.
    fn delete_result_keys(&self, keys: &[String]) -> StateResult<u32> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let count = keys.len() as u32;
        {
            let mut table = txn.open_table(RESULTS).map_err(map_err!(Table))?;
            for key in keys {
                table.remove(key.as_str()).map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(count, "results deleted");
        Ok(count)
    }
}
