//! Gateway error types.

use thiserror::Error;

/// Errors that can occur when talking to the authorization/history gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the gateway.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a gateway response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Gateway answered with `success: false`.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Whether the gateway could not be reached at all.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }
}
