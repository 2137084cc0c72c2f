use lookout_core::{AuthorizationResult, SessionId};
use lookout_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The gateway refused the search. Nothing was dispatched.
    #[error("search denied: {}", .0.reason.as_deref().unwrap_or("no reason given"))]
    Denied(AuthorizationResult),

    /// History write requested before every adapter settled.
    #[error("session {0} has not settled")]
    NotSettled(SessionId),

    /// History for this session was already written.
    #[error("session {0} was already finalized")]
    AlreadyFinalized(SessionId),

    #[error("history write failed: {0}")]
    History(#[from] GatewayError),
}

impl SearchError {
    /// The denial, if the search was refused by the gateway.
    #[must_use]
    pub const fn denial(&self) -> Option<&AuthorizationResult> {
        match self {
            Self::Denied(auth) => Some(auth),
            _ => None,
        }
    }
}
