//! Pure functions for mapping access errors to HTTP status codes.
//!
//! The data layer itself never speaks HTTP; request handlers layered on top
//! use this mapping so every error renders with a consistent status.

use super::AccessError;

/// Maps an [`AccessError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `Validation` -> 400 (Bad Request)
/// - `UnknownType` -> 400 (Bad Request)
/// - `IdentityMismatch` -> 400 (Bad Request)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `StoreUnavailable` -> 502 (Bad Gateway)
pub fn access_error_to_status_code(error: &AccessError) -> u16 {
    match error {
        AccessError::NotFound { .. } => 404,
        AccessError::AlreadyExists { .. } => 409,
        AccessError::Validation(_) => 400,
        AccessError::UnknownType(_) => 400,
        AccessError::IdentityMismatch { .. } => 400,
        AccessError::Serialization(_) => 500,
        AccessError::StoreUnavailable(_) => 502,
    }
}
