use thiserror::Error;

/// Rule violations raised by entity self-validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{entity_type} is missing an id")]
    MissingId { entity_type: &'static str },
    #[error("Unexpected type: {candidate}. Expected type: {expected}")]
    UnexpectedType {
        expected: &'static str,
        candidate: String,
    },
    #[error("User name cannot be empty")]
    EmptyUserName,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Role name cannot be empty")]
    EmptyRoleName,
    #[error("Role permission cannot be empty")]
    EmptyPermission,
}
