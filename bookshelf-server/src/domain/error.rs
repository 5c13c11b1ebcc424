use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("please fill all fields")]
    MissingFields,

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("image upload failed: {0}")]
    Upload(String),

    #[error("persistence failed: {0}")]
    Persistence(String),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

/// Reasons the auth guard rejects a request. All of them surface as 401, the
/// distinction only exists for logs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthError {
    #[error("no bearer token")]
    NoToken,

    #[error("token is not valid")]
    InvalidToken,

    #[error("user for token not found")]
    UserNotFound,
}
