//! ResultLedger — indexed result payloads per (daemon, plugin, run index).
//!
//! Pushes require a registered daemon (connected or not) and overwrite any
//! existing payload at the same (plugin, index) key wholesale. Reads report
//! NotFound on empty sets; deletes at every granularity are idempotent
//! successes.

use serde_json::Value;
use tracing::debug;

use trident_state::{RecordStore, ResultRecord};

use crate::error::{RegistryError, RegistryResult};

#[derive(Clone)]
pub struct ResultLedger {
    store: RecordStore,
}

impl ResultLedger {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Upsert the result payload at (daemon, plugin, index).
    ///
    /// The daemon must be registered; the plugin name is taken at face value
    /// (a plugin row is not required, matching the upstream behavior).
    pub fn put_result(
        &self,
        daemon: &str,
        plugin_name: &str,
        index: i64,
        result: Value,
    ) -> RegistryResult<()> {
        if self.store.get_daemon(daemon)?.is_none() {
            return Err(RegistryError::Validation(format!(
                "daemon '{daemon}' is not registered"
            )));
        }
        let record = ResultRecord {
            index,
            result,
            plugin_name: plugin_name.to_string(),
            daemon: daemon.to_string(),
        };
        self.store.put_result(&record)?;
        debug!(%daemon, plugin = %plugin_name, index, "result recorded");
        Ok(())
    }

    /// All results for a daemon, across plugins and indices.
    pub fn list_results(&self, daemon: &str) -> RegistryResult<Vec<ResultRecord>> {
        let results = self.store.list_results(daemon)?;
        if results.is_empty() {
            return Err(RegistryError::NotFound(format!(
                "no results for daemon '{daemon}'"
            )));
        }
        Ok(results)
    }

    /// All results for one plugin of a daemon.
    pub fn list_results_for_plugin(
        &self,
        daemon: &str,
        plugin_name: &str,
    ) -> RegistryResult<Vec<ResultRecord>> {
        let results = self.store.list_results_for_plugin(daemon, plugin_name)?;
        if results.is_empty() {
            return Err(RegistryError::NotFound(format!(
                "no results for plugin '{plugin_name}' of daemon '{daemon}'"
            )));
        }
        Ok(results)
    }

    /// The result at an exact (daemon, plugin, index) coordinate.
    pub fn get_result(
        &self,
        daemon: &str,
        plugin_name: &str,
        index: i64,
    ) -> RegistryResult<ResultRecord> {
        self.store.get_result(daemon, plugin_name, index)?.ok_or_else(|| {
            RegistryError::NotFound(format!(
                "no result at index {index} for plugin '{plugin_name}' of daemon '{daemon}'"
            ))
        })
    }

    /// Delete every result for a daemon. Idempotent.
    pub fn delete_results(&self, daemon: &str) -> RegistryResult<()> {
        self.store.delete_results(daemon)?;
        Ok(())
    }

    /// Delete every result for one plugin of a daemon. Idempotent.
    pub fn delete_results_for_plugin(&self, daemon: &str, plugin_name: &str) -> RegistryResult<()> {
        self.store.delete_results_for_plugin(daemon, plugin_name)?;
        Ok(())
    }

    /// Delete the single result at (daemon, plugin, index). Idempotent.
    pub fn delete_result(&self, daemon: &str, plugin_name: &str, index: i64) -> RegistryResult<()> {
        self.store.delete_result(daemon, plugin_name, index)?;
        Ok(())
    }
}
