use crate::types::DbId;

/// Domain-level error type shared across crates.
///
/// HTTP mapping lives in `atelier-api`; this type stays transport-agnostic.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup came back empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed domain validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Anything unexpected that is not the caller's fault.
    #[error("Internal error: {0}")]
    Internal(String),
}
