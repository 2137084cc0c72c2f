//! One-shot handoff of a search from the selection trigger to the searcher.
//!
//! The trigger posts a pending search and receives a correlation id; the
//! searcher takes it by that id. A record is delivered at most once, and
//! never once it is older than the freshness window.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lookout_core::QueryKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LocalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hnd-{}", self.0.simple())
    }
}

/// A search waiting to be picked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSearch {
    pub correlation_id: CorrelationId,
    pub kind: QueryKind,
    pub query: String,
    pub created_at: DateTime<Utc>,
}

impl PendingSearch {
    /// Milliseconds between creation and `now`. Clock skew reads as zero.
    #[must_use]
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_milliseconds().max(0)
    }
}

pub struct HandoffMailbox {
    freshness: Duration,
    pending: Mutex<HashMap<CorrelationId, PendingSearch>>,
}

impl HandoffMailbox {
    #[must_use]
    pub fn new(freshness: Duration) -> Self {
        Self {
            freshness,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Post a search created now.
    pub fn post(&self, kind: QueryKind, query: impl Into<String>) -> CorrelationId {
        self.post_at(kind, query, Utc::now())
    }

    /// Post a search with an explicit creation time.
    pub fn post_at(
        &self,
        kind: QueryKind,
        query: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> CorrelationId {
        let correlation_id = CorrelationId::new();
        let record = PendingSearch {
            correlation_id,
            kind,
            query: query.into(),
            created_at,
        };
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(correlation_id, record);
        }
        tracing::debug!(%correlation_id, %kind, "pending search posted");
        correlation_id
    }

    /// Take a pending search if it is still fresh.
    ///
    /// # Errors
    ///
    /// See [`take_at`](Self::take_at).
    pub fn take(&self, id: CorrelationId) -> Result<PendingSearch, LocalError> {
        self.take_at(id, Utc::now())
    }

    /// Take a pending search, judging freshness at `now`.
    ///
    /// The record is removed either way.
    ///
    /// # Errors
    ///
    /// [`LocalError::HandoffMissing`] if nothing is pending under `id`, and
    /// [`LocalError::HandoffExpired`] if the record is as old as the
    /// freshness window or older.
    pub fn take_at(&self, id: CorrelationId, now: DateTime<Utc>) -> Result<PendingSearch, LocalError> {
        let record = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&id))
            .ok_or(LocalError::HandoffMissing(id))?;

        let age_ms = record.age_ms(now);
        if !self.is_fresh(age_ms) {
            tracing::debug!(correlation_id = %id, age_ms, "discarding stale pending search");
            return Err(LocalError::HandoffExpired { id, age_ms });
        }
        Ok(record)
    }

    /// Drop every stale record. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let Ok(mut pending) = self.pending.lock() else {
            return 0;
        };
        let before = pending.len();
        pending.retain(|_, record| self.is_fresh(record.age_ms(now)));
        before - pending.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, age_ms: i64) -> bool {
        u128::try_from(age_ms).is_ok_and(|age| age < self.freshness.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rstest::rstest;

    fn mailbox() -> HandoffMailbox {
        HandoffMailbox::new(Duration::from_millis(10_000))
    }

    #[rstest]
    #[case(0, true)]
    #[case(9_999, true)]
    #[case(10_000, false)]
    #[case(10_001, false)]
    fn freshness_window(#[case] age_ms: i64, #[case] accepted: bool) {
        let mailbox = mailbox();
        let created = Utc::now();
        let id = mailbox.post_at(QueryKind::Username, "octocat", created);

        let taken = mailbox.take_at(id, created + TimeDelta::milliseconds(age_ms));

        assert_eq!(taken.is_ok(), accepted);
        assert!(mailbox.is_empty(), "record is consumed either way");
    }

    #[test]
    fn delivered_at_most_once() {
        let mailbox = mailbox();
        let id = mailbox.post(QueryKind::Email, "someone@example.com");

        let first = mailbox.take(id).unwrap();
        assert_eq!(first.query, "someone@example.com");
        assert_eq!(first.kind, QueryKind::Email);

        assert!(matches!(mailbox.take(id), Err(LocalError::HandoffMissing(_))));
    }

    #[test]
    fn correlation_ids_keep_posts_apart() {
        let mailbox = mailbox();
        let a = mailbox.post(QueryKind::Username, "alice");
        let b = mailbox.post(QueryKind::Username, "bob");
        assert_eq!(mailbox.take(b).unwrap().query, "bob");
        assert_eq!(mailbox.take(a).unwrap().query, "alice");
    }

    #[test]
    fn purge_removes_only_stale_records() {
        let mailbox = mailbox();
        let now = Utc::now();
        mailbox.post_at(QueryKind::Username, "old", now - TimeDelta::seconds(30));
        let fresh = mailbox.post_at(QueryKind::Username, "new", now);

        assert_eq!(mailbox.purge_expired(now), 1);
        assert_eq!(mailbox.len(), 1);
        assert_eq!(mailbox.take_at(fresh, now).unwrap().query, "new");
    }
}
