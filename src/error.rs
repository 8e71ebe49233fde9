//! Crate-level error type returned by the typed API clients.

use crate::net::types::ApiError;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request failed and was normalized by the pipeline.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A successful response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("invalid photo: {0}")]
    InvalidPhoto(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A profile response arrived after the session was replaced or cleared.
    #[error("session changed while the request was in flight")]
    SessionChanged,
}

impl ClientError {
    /// HTTP status of a normalized API failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            _ => None,
        }
    }
}
