//! PluginCatalog — scoped lookups over a daemon's declared plugin roster.
//!
//! Plugin rows are written once, by the registry engine at first
//! registration; the catalog only reads. An empty lookup result is reported
//! as NotFound, so "daemon missing" and "daemon has no plugins" are
//! indistinguishable here by design.

use trident_state::{PluginRecord, RecordStore};

use crate::error::{RegistryError, RegistryResult};

#[derive(Clone)]
pub struct PluginCatalog {
    store: RecordStore,
}

impl PluginCatalog {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// All plugins declared by a daemon. NotFound if there are none.
    pub fn list_plugins(&self, daemon: &str) -> RegistryResult<Vec<PluginRecord>> {
        let plugins = self.store.list_plugins(daemon)?;
        if plugins.is_empty() {
            return Err(RegistryError::NotFound(format!(
                "no plugins for daemon '{daemon}'"
            )));
        }
        Ok(plugins)
    }

    /// One plugin by daemon and plugin name.
    pub fn get_plugin(&self, daemon: &str, plugin_name: &str) -> RegistryResult<PluginRecord> {
        self.store.get_plugin(daemon, plugin_name)?.ok_or_else(|| {
            RegistryError::NotFound(format!("no plugin '{plugin_name}' for daemon '{daemon}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trident_state::{DaemonRecord, PluginSpec};

    fn catalog_with_daemon() -> PluginCatalog {
        let store = RecordStore::open_in_memory().unwrap();
        let record = DaemonRecord {
            daemon: "tired-panda".to_string(),
            host_addr: "192.168.1.1".to_string(),
            worker_count: 5,
            arguments: json!({"logging_level": "DEBUG", "args": null}),
        };
        let plugins = vec![
            PluginSpec {
                plugin_name: "find-file".to_string(),
                arguments: Some(json!({"store": {"path": "stores"}})),
            },
            PluginSpec {
                plugin_name: "scan-hosts-file".to_string(),
                arguments: None,
            },
        ];
        store.register_daemon(&record, &plugins).unwrap();
        PluginCatalog::new(store)
    }

    #[test]
    fn list_plugins_returns_declared_roster() {
        let catalog = catalog_with_daemon();
        let plugins = catalog.list_plugins("tired-panda").unwrap();

        let names: Vec<&str> = plugins.iter().map(|p| p.plugin_name.as_str()).collect();
        assert_eq!(plugins.len(), 2);
        assert!(names.contains(&"find-file"));
        assert!(names.contains(&"scan-hosts-file"));
    }

    #[test]
    fn list_plugins_unknown_daemon_is_not_found() {
        let catalog = catalog_with_daemon();
        let err = catalog.list_plugins("round-giraffe").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn get_plugin_without_arguments_has_null_arguments() {
        let catalog = catalog_with_daemon();
        let plugin = catalog.get_plugin("tired-panda", "scan-hosts-file").unwrap();
        assert!(plugin.arguments.is_none());
    }

    #[test]
    fn get_plugin_missing_is_not_found() {
        let catalog = catalog_with_daemon();
        let err = catalog.get_plugin("tired-panda", "plugin-name").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }
}
