use thiserror::Error;

use crate::handoff::CorrelationId;

#[derive(Debug, Error)]
pub enum LocalError {
    #[error("credential store error: {0}")]
    CredentialStore(String),

    #[error("credentials are malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No pending search under this id, or it was already taken.
    #[error("no pending search {0}")]
    HandoffMissing(CorrelationId),

    /// The pending search was older than the freshness window and has been
    /// discarded.
    #[error("pending search {id} expired ({age_ms} ms old)")]
    HandoffExpired { id: CorrelationId, age_ms: i64 },
}
