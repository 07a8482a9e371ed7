//! RegistryEngine — the daemon connection/registration state machine.
//!
//! A daemon's durable identity (its Daemon row), its current connectivity
//! (presence of a ConnectedDaemon marker), and the plugin roster declared at
//! registration are kept consistent here. First registrations insert the
//! Daemon row, every declared Plugin row, and the connectivity marker as one
//! atomic store batch; reconnects only touch the marker.

use serde_json::{Value, json};
use tracing::{debug, warn};

use trident_state::{
    ConnectedRecord, DaemonRecord, PluginSpec, RecordStore, StateError,
};

use crate::error::{RegistryError, RegistryResult};
use crate::names;

/// Generated-name collision retries before giving up. Collisions are rare
/// with the shipped word lists; hitting this bound means the namespace is
/// effectively exhausted.
const MAX_NAME_ATTEMPTS: usize = 64;

/// One plugin entry from a daemon's declared configuration.
#[derive(Debug, Clone)]
pub struct PluginDecl {
    pub name: String,
    /// The entry's `args` sub-object, if present.
    pub arguments: Option<Value>,
}

/// Validated connect request, as handed to the engine by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct ConnectSpec {
    /// Present when an existing daemon is merely (re)connecting.
    pub daemon: Option<String>,
    pub host_addr: Option<String>,
    pub worker_count: Option<u32>,
    pub logging_level: Option<Value>,
    pub args: Option<Value>,
    pub plugins: Vec<PluginDecl>,
}

/// The connect/disconnect/removal state machine over daemon records.
#[derive(Clone)]
pub struct RegistryEngine {
    store: RecordStore,
}

impl RegistryEngine {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Connect a daemon to the dashboard, returning its identifier.
    ///
    /// With a requested name this only re-marks an existing daemon as
    /// connected; the request's `host_addr`/`worker_count` are ignored.
    /// Without one this is a first-time registration: a unique
    /// `<adjective>-<animal>` name is generated and the Daemon row, its
    /// Plugin rows, and the connectivity marker are inserted atomically.
    ///
    /// Connecting an already-connected daemon is a validation error either
    /// way.
    pub fn connect(&self, spec: ConnectSpec) -> RegistryResult<String> {
        match spec.daemon {
            Some(name) => self.reconnect(name),
            None => self.register(spec),
        }
    }

    fn reconnect(&self, name: String) -> RegistryResult<String> {
        // A connectivity marker must reference a registered daemon.
        if self.store.get_daemon(&name)?.is_none() {
            return Err(RegistryError::Validation(format!(
                "daemon '{name}' is not registered"
            )));
        }
        self.store.mark_connected(&name)?;
        debug!(daemon = %name, "daemon reconnected");
        Ok(name)
    }

    fn register(&self, spec: ConnectSpec) -> RegistryResult<String> {
        let host_addr = spec
            .host_addr
            .ok_or_else(|| RegistryError::Validation("'host_addr' is required".to_string()))?;
        let worker_count = spec
            .worker_count
            .ok_or_else(|| RegistryError::Validation("'worker_count' is required".to_string()))?;
        if worker_count == 0 {
            return Err(RegistryError::Validation(
                "'worker_count' must be positive".to_string(),
            ));
        }

        let arguments = json!({
            "logging_level": spec.logging_level,
            "args": spec.args,
        });
        let plugins: Vec<PluginSpec> = spec
            .plugins
            .into_iter()
            .map(|decl| PluginSpec {
                plugin_name: decl.name,
                arguments: decl.arguments,
            })
            .collect();

        // Generated names are checked against existing registrations, but
        // the store's conflict check at commit is what actually guarantees
        // uniqueness; a racing insert just sends us around the loop again.
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = names::candidate();
            if self.store.get_daemon(&name)?.is_some() {
                continue;
            }
            let record = DaemonRecord {
                daemon: name.clone(),
                host_addr: host_addr.clone(),
                worker_count,
                arguments: arguments.clone(),
            };
            match self.store.register_daemon(&record, &plugins) {
                Ok(()) => {
                    debug!(daemon = %name, plugins = plugins.len(), "daemon registered");
                    return Ok(name);
                }
                Err(StateError::Conflict(_)) => {
                    warn!(daemon = %name, "generated name raced an existing registration, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(RegistryError::Internal(
            "exhausted daemon name candidates".to_string(),
        ))
    }

    /// Remove the connectivity marker for a daemon. Idempotent: succeeds
    /// whether or not the daemon was connected (or ever existed).
    pub fn disconnect(&self, daemon: &str) -> RegistryResult<()> {
        self.store.mark_disconnected(daemon)?;
        Ok(())
    }

    /// List all currently connected daemons. NotFound when none are.
    pub fn list_connected(&self) -> RegistryResult<Vec<ConnectedRecord>> {
        let connected = self.store.list_connected()?;
        if connected.is_empty() {
            return Err(RegistryError::NotFound(
                "no daemons connected".to_string(),
            ));
        }
        Ok(connected)
    }

    /// Remove a daemon's registration and connectivity marker. Idempotent.
    ///
    /// Plugin and Result rows are deliberately left in place; results can be
    /// cleared separately through the result ledger.
    pub fn remove(&self, daemon: &str) -> RegistryResult<()> {
        self.store.remove_daemon(daemon)?;
        Ok(())
    }

    /// Get a daemon's registration record.
    pub fn get(&self, daemon: &str) -> RegistryResult<DaemonRecord> {
        self.store
            .get_daemon(daemon)?
            .ok_or_else(|| RegistryError::NotFound(format!("no daemon '{daemon}'")))
    }
}
