//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for stores and the registry.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Malformed or missing input (empty key, null value, bad store name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Registry lookup of a name that is not registered
    #[error("Not found: {0}")]
    NotFound(String),

    /// Registry name collision on add
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Store is at its key cap and the write would add a new key
    #[error("max keys limit: {0} exhausted. Cannot add any new key")]
    MaxSizeReached(usize),

    /// The external client failed a round trip
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),

    /// A value could not be encoded to or decoded from the wire form
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::DuplicateKey(_) => StatusCode::CONFLICT,
            CacheError::MaxSizeReached(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Backend(_) => StatusCode::BAD_GATEWAY,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache facade.
pub type Result<T> = std::result::Result<T, CacheError>;
