use diesel_async::pooled_connection::PoolError;
use notifications::DispatchError;
use warp::{http::StatusCode, reject::Reject};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("Database query error: {0}")]
    DbQueryError(#[from] diesel::result::Error),

    #[error("Database pool error: {0}")]
    PoolError(#[from] bb8::RunError<PoolError>),

    #[error("Database error: {0}")]
    DatabaseError(#[from] database::error::Error),
}

impl Reject for Error {}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Dispatch(e) => e.code(),
            _ => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Dispatch(DispatchError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Error::Dispatch(DispatchError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            Error::Dispatch(DispatchError::Internal(_)) => {
                "Failed to send notifications".to_string()
            }
            Error::Dispatch(e) => e.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}
