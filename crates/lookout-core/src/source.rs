//! Per-adapter lookup outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error detail for an adapter that missed its deadline.
pub const TIMEOUT_DETAIL: &str = "timeout";
/// Error detail for an adapter whose search was superseded.
pub const CANCELLED_DETAIL: &str = "cancelled";

/// Status of one adapter invocation.
///
/// `Speculative` marks results manufactured without querying the platform.
/// They carry no evidentiary weight and are never counted as found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Found,
    NotFound,
    Error,
    Speculative,
}

impl SourceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::Error => "error",
            Self::Speculative => "speculative",
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One adapter's normalized outcome for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    pub source_id: String,
    pub status: SourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl SourceResult {
    #[must_use]
    pub fn found(source_id: impl Into<String>, payload: Value) -> Self {
        Self {
            source_id: source_id.into(),
            status: SourceStatus::Found,
            payload: Some(payload),
            error_detail: None,
        }
    }

    #[must_use]
    pub fn not_found(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            status: SourceStatus::NotFound,
            payload: None,
            error_detail: None,
        }
    }

    #[must_use]
    pub fn error(source_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            status: SourceStatus::Error,
            payload: None,
            error_detail: Some(detail.into()),
        }
    }

    #[must_use]
    pub fn speculative(source_id: impl Into<String>, payload: Value) -> Self {
        Self {
            source_id: source_id.into(),
            status: SourceStatus::Speculative,
            payload: Some(payload),
            error_detail: None,
        }
    }

    #[must_use]
    pub fn timeout(source_id: impl Into<String>) -> Self {
        Self::error(source_id, TIMEOUT_DETAIL)
    }

    #[must_use]
    pub fn cancelled(source_id: impl Into<String>) -> Self {
        Self::error(source_id, CANCELLED_DETAIL)
    }

    /// Only genuine lookups that found a profile count as evidence.
    #[must_use]
    pub fn is_evidence(&self) -> bool {
        self.status == SourceStatus::Found
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.status == SourceStatus::Error && self.error_detail.as_deref() == Some(TIMEOUT_DETAIL)
    }
}
