use diesel_async::pooled_connection::PoolError;
use thiserror::Error;

/// Infrastructure failures that abort a whole run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Push gateway error: {0}")]
    GatewayError(String),

    // Comes from `conn.transaction()` calls
    #[error("Database transaction error: {0}")]
    TransactionError(#[from] diesel::result::Error),

    // Comes from database repos
    #[error("Database error: {0}")]
    DatabaseError(#[from] database::error::Error),

    #[error("Database pool error: {0}")]
    PoolError(#[from] bb8::RunError<PoolError>),
}

/// Reasons a dispatch call is rejected as a whole.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("The function must be called while authenticated.")]
    Unauthenticated,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Failed to send notifications: {0}")]
    Internal(String),
}

impl DispatchError {
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::Unauthenticated => "unauthenticated",
            DispatchError::InvalidArgument(_) => "invalid-argument",
            DispatchError::Internal(_) => "internal",
        }
    }
}
