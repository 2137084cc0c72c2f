//! Source adapter error types.
//!
//! These never escape [`crate::SourceAdapter::lookup`]: every adapter folds
//! its errors into a `SourceResult` with `status = error`. The registry uses
//! them for configuration problems.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The provider returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The provider rejected the lookup with its own message.
    #[error("{0}")]
    Rejected(String),

    /// No adapter is registered under this id.
    #[error("unknown source: {0}")]
    UnknownSource(String),
}
