//! Outcome of asking the remote gateway to authorize (and charge) a search.

use serde::{Deserialize, Serialize};

/// Reason recorded when the gateway could not be reached.
pub const CONNECTIVITY_REASON: &str = "connectivity";

/// Result of one authorization attempt. Never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResult {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_seconds: Option<u64>,
}

/// Why a search was denied, derived from the gateway's free-text reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Cooldown,
    InsufficientCredits,
    InvalidToken,
    Connectivity,
    Other,
}

impl AuthorizationResult {
    #[must_use]
    pub const fn allowed(credits_remaining: Option<i64>) -> Self {
        Self {
            allowed: true,
            reason: None,
            credits_remaining,
            cooldown_seconds: None,
        }
    }

    #[must_use]
    pub fn denied(reason: impl Into<String>, cooldown_seconds: Option<u64>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            credits_remaining: None,
            cooldown_seconds,
        }
    }

    /// The gateway could not be reached. Not retried automatically.
    #[must_use]
    pub fn connectivity() -> Self {
        Self::denied(CONNECTIVITY_REASON, None)
    }

    /// Classify a denial. Returns `None` for allowed results.
    #[must_use]
    pub fn denial_kind(&self) -> Option<DenialKind> {
        if self.allowed {
            return None;
        }
        if self.cooldown_seconds.is_some() {
            return Some(DenialKind::Cooldown);
        }
        let reason = self.reason.as_deref().unwrap_or_default().to_ascii_lowercase();
        let kind = if reason == CONNECTIVITY_REASON {
            DenialKind::Connectivity
        } else if reason.contains("credit") {
            DenialKind::InsufficientCredits
        } else if reason.contains("token") {
            DenialKind::InvalidToken
        } else {
            DenialKind::Other
        };
        Some(kind)
    }
}
