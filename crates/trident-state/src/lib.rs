//! trident-state — embedded record store for the Trident dashboard.
//!
//! Backed by [redb](https://docs.rs/redb), provides persistent and in-memory
//! storage for the four record kinds the dashboard tracks: daemons, their
//! connectivity markers, plugins, and plugin results.
//!
//! # Architecture
//!
//! All record types are JSON-serialized into redb's `&[u8]` value columns.
//! Composite keys (`{daemon}/{plugin_name}`, `{plugin_name}:{index}`) enable
//! efficient prefix scans for daemon- and plugin-scoped records.
//!
//! The `RecordStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::RecordStore;
pub use types::*;
