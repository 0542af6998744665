use thiserror::Error;

/// Application-wide error types for Shelf.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing request input.
    #[error("{0}")]
    Validation(String),

    /// Unknown username or wrong password. Deliberately carries no detail.
    #[error("Invalid credentials. Please check your username and password.")]
    InvalidCredentials,

    /// Request is not (or no longer) authenticated.
    #[error("{0}")]
    Authentication(String),

    /// Requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unique constraint clash, e.g. a username that is already taken.
    #[error("{0}")]
    Conflict(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Unexpected failure (hashing, token encoding, task join).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true if the error originates from the server side rather than the caller.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::ConfigError(_) | AppError::DatabaseError(_) | AppError::Internal(_)
        )
    }
}
