//! Error taxonomy for the Trident domain layer.

use thiserror::Error;
use trident_state::StateError;

/// Result type alias for domain operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced by the registry engine, plugin catalog, and result
/// ledger. The HTTP layer maps these onto 400/404/500.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed or missing input, or a constraint violation attributable to
    /// the caller (duplicate connect, name collision, unknown daemon on a
    /// write path).
    #[error("validation error: {0}")]
    Validation(String),

    /// No matching record.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage or serialization failure not attributable to caller input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StateError> for RegistryError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Conflict(msg) => RegistryError::Validation(msg),
            other => RegistryError::Internal(other.to_string()),
        }
    }
}
