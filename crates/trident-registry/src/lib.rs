//! trident-registry — the Trident dashboard domain layer.
//!
//! Three subsystems over the [`trident_state::RecordStore`]:
//!
//! - [`RegistryEngine`] — the connect/disconnect/removal state machine for
//!   daemons, including word-pair name generation for anonymous
//!   registrations.
//! - [`PluginCatalog`] — scoped lookups over the plugin roster a daemon
//!   declared at registration time.
//! - [`ResultLedger`] — indexed result payloads per (daemon, plugin, run
//!   index), with partial deletes at every granularity.
//!
//! All three classify store failures into the Validation/NotFound/Internal
//! taxonomy the HTTP layer maps onto status codes.

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod names;
pub mod registry;

pub use catalog::PluginCatalog;
pub use error::{RegistryError, RegistryResult};
pub use ledger::ResultLedger;
pub use registry::{ConnectSpec, PluginDecl, RegistryEngine};
