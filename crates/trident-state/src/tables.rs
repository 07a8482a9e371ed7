//! redb table definitions for the Trident record store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized record
//! types). Composite keys follow the pattern `{daemon}/{plugin_name}` or
//! `{plugin_name}:{index}`.

use redb::TableDefinition;

/// Daemon registrations keyed by `{daemon}`.
pub const DAEMONS: TableDefinition<&str, &[u8]> = TableDefinition::new("daemons");

/// Connectivity markers keyed by `{daemon}`. Presence of a row is the
/// definition of "connected"; there is no status flag.
pub const CONNECTED: TableDefinition<&str, &[u8]> = TableDefinition::new("connected_daemons");

/// Plugin declarations keyed by `{daemon}/{plugin_name}`.
pub const PLUGINS: TableDefinition<&str, &[u8]> = TableDefinition::new("plugins");

/// Result payloads keyed by `{plugin_name}:{index}`.
pub const RESULTS: TableDefinition<&str, &[u8]> = TableDefinition::new("results");

/// Store-internal bookkeeping (plugin id sequence) keyed by name.
pub const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

/// META key holding the next surrogate plugin id.
pub const NEXT_PLUGIN_ID: &str = "next_plugin_id";
