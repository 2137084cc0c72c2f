//! The aggregate of one search: query, authorization, and collected results.
//!
//! A session is keyed by its own [`SessionId`] so overlapping searches never
//! share a result collection. Query and authorization are fixed at creation;
//! results are append-only with at most one entry per source.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authorization::AuthorizationResult;
use crate::errors::CoreError;
use crate::query::Query;
use crate::source::{SourceResult, SourceStatus};

/// Identifier of one search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ses-{}", self.0.simple())
    }
}

/// Per-status counts over a session's results, stored with history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub errors: usize,
    pub speculative: usize,
    /// Sources with a genuine match, in arrival order.
    pub found_sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSession {
    id: SessionId,
    query: Query,
    authorization: AuthorizationResult,
    results: Vec<SourceResult>,
    dispatched: usize,
    started_at: DateTime<Utc>,
    settled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    finalized: bool,
}

impl SearchSession {
    #[must_use]
    pub fn new(query: Query, authorization: AuthorizationResult) -> Self {
        Self {
            id: SessionId::new(),
            query,
            authorization,
            results: Vec::new(),
            dispatched: 0,
            started_at: Utc::now(),
            settled_at: None,
            finalized: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    #[must_use]
    pub const fn authorization(&self) -> &AuthorizationResult {
        &self.authorization
    }

    /// Results in arrival order.
    #[must_use]
    pub fn results(&self) -> &[SourceResult] {
        &self.results
    }

    #[must_use]
    pub fn result_for(&self, source_id: &str) -> Option<&SourceResult> {
        self.results.iter().find(|r| r.source_id == source_id)
    }

    #[must_use]
    pub const fn dispatched(&self) -> usize {
        self.dispatched
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub const fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }

    /// Record how many adapters were dispatched for this session.
    pub const fn set_dispatched(&mut self, count: usize) {
        self.dispatched = count;
    }

    /// Append one adapter result.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateSource`] if the session already holds a
    /// result for the same source. The existing entry is left untouched.
    pub fn record(&mut self, result: SourceResult) -> Result<(), CoreError> {
        if self.result_for(&result.source_id).is_some() {
            return Err(CoreError::DuplicateSource {
                session: self.id,
                source_id: result.source_id,
            });
        }
        self.results.push(result);
        Ok(())
    }

    /// Whether every dispatched adapter has delivered a result.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.results.len() >= self.dispatched
    }

    /// Stamp the settlement time. Later calls keep the first timestamp.
    pub fn mark_settled(&mut self) {
        if self.settled_at.is_none() {
            self.settled_at = Some(Utc::now());
        }
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Mark the history write as done. Returns `false` if it already was.
    pub const fn mark_finalized(&mut self) -> bool {
        if self.finalized {
            return false;
        }
        self.finalized = true;
        true
    }

    #[must_use]
    pub fn summary(&self) -> ResultsSummary {
        let mut summary = ResultsSummary {
            total: self.results.len(),
            ..ResultsSummary::default()
        };
        for result in &self.results {
            match result.status {
                SourceStatus::Found => {
                    summary.found += 1;
                    summary.found_sources.push(result.source_id.clone());
                }
                SourceStatus::NotFound => summary.not_found += 1,
                SourceStatus::Error => summary.errors += 1,
                SourceStatus::Speculative => summary.speculative += 1,
            }
        }
        summary
    }
}
