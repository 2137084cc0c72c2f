//! Cross-cutting error types for Lookout.
//!
//! Domain-specific errors (e.g., `GatewayError`, `SourceError`) are defined in
//! their respective crates. They converge into `anyhow` in `lookout-cli`.

use thiserror::Error;

use crate::session::SessionId;

/// Errors that can be raised by any Lookout crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// User input failed superficial validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A session already holds a result for this source.
    #[error("Session {session} already has a result for source '{source_id}'")]
    DuplicateSource { session: SessionId, source_id: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
