use thiserror::Error;

use crate::identity::ValidationError;

/// Errors surfaced by the data access layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Cannot merge {ours} with {theirs}: identities differ")]
    IdentityMismatch { ours: String, theirs: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Result type for access operations.
pub type Result<T, E = AccessError> = std::result::Result<T, E>;
