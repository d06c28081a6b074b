//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur during API client operations.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Transport-level failure (connection refused, timeout, TLS).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status and message.
    #[error("api error ({status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
    },

    /// A 401 outside the exempt endpoints; the session has been cleared.
    #[error("session expired")]
    SessionExpired,

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Session file could not be read or written.
    #[error("session store error: {0}")]
    SessionStore(#[from] std::io::Error),
}
