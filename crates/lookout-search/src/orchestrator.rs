use std::sync::{Arc, Mutex};

use futures::StreamExt;
use lookout_core::{AuthorizationResult, Query, SearchSession};
use lookout_gateway::{Gateway, HistoryEntry};
use lookout_sources::{LookupContext, SourceRegistry};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::dispatch::{Deadlines, DispatchStream, dispatch};
use crate::error::SearchError;
use crate::sink::ResultSink;

/// A completed search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub session: SearchSession,
    /// Whether the history write succeeded.
    pub history_saved: bool,
    /// Whether the search was cancelled before it settled, by a newer
    /// search or by [`SearchOrchestrator::cancel_active`].
    pub cancelled: bool,
}

/// Runs searches: authorize, fan out, deliver, record.
///
/// Only one search is active per orchestrator. A newly authorized search
/// cancels the adapters still running for the previous one; its session
/// still settles, with the cancelled adapters reported as such, and is not
/// written to history. A refused search leaves the active one untouched.
pub struct SearchOrchestrator {
    gateway: Arc<dyn Gateway>,
    registry: SourceRegistry,
    deadlines: Deadlines,
    active: Mutex<Option<CancellationToken>>,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, registry: SourceRegistry, deadlines: Deadlines) -> Self {
        Self {
            gateway,
            registry,
            deadlines,
            active: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Ask the gateway to authorize and charge one search.
    ///
    /// An unreachable gateway yields a connectivity denial. Any other
    /// gateway failure is a denial carrying the error, since the gateway may
    /// have charged the search before failing. No retry.
    pub async fn authorize(&self, token: &str, query: &Query) -> AuthorizationResult {
        match self.gateway.log_search(token, query).await {
            Ok(auth) => {
                if let Some(credits) = auth.credits_remaining {
                    tracing::debug!(credits, "search authorized");
                }
                auth
            }
            Err(error) if error.is_connectivity() => {
                tracing::warn!(%error, "gateway unreachable, search denied");
                AuthorizationResult::connectivity()
            }
            Err(error) => {
                tracing::warn!(%error, "gateway failed, search denied");
                AuthorizationResult::denied(format!("gateway error: {error}"), None)
            }
        }
    }

    /// Fan `query` out to every registered adapter for its kind.
    pub fn dispatch(
        &self,
        query: &Query,
        ctx: LookupContext,
        cancel: CancellationToken,
    ) -> DispatchStream {
        let adapters = self.registry.for_kind(query.kind());
        dispatch(query, adapters, ctx, self.deadlines, cancel)
    }

    /// Write a settled session to history.
    ///
    /// # Errors
    ///
    /// [`SearchError::NotSettled`] before every dispatched adapter has
    /// reported, [`SearchError::AlreadyFinalized`] on a second call, and
    /// [`SearchError::History`] if the gateway write fails. The session's
    /// results are never altered.
    pub async fn finalize(&self, token: &str, session: &mut SearchSession) -> Result<(), SearchError> {
        if !session.is_settled() || session.settled_at().is_none() {
            return Err(SearchError::NotSettled(session.id()));
        }
        if !session.mark_finalized() {
            return Err(SearchError::AlreadyFinalized(session.id()));
        }

        let entry = HistoryEntry {
            kind: session.query().kind(),
            query: session.query().history_label(),
            result: json!({
                "summary": session.summary(),
                "results": session.results(),
            }),
        };
        self.gateway
            .save_to_history(token, &entry)
            .await
            .inspect_err(|error| {
                tracing::warn!(session = %session.id(), %error, "history write failed");
            })?;
        Ok(())
    }

    /// Cancel the active search, if any.
    pub fn cancel_active(&self) {
        if let Ok(mut active) = self.active.lock()
            && let Some(token) = active.take()
        {
            token.cancel();
        }
    }

    /// Run one search end to end.
    ///
    /// Results reach `sink` as they arrive, followed by exactly one
    /// `on_settled`. The history write happens after that and its failure
    /// does not fail the search. A search cancelled by a newer one skips
    /// the history write.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Denied`] when the gateway refuses the search,
    /// in which case no adapter is contacted.
    pub async fn run(
        &self,
        token: &str,
        query: Query,
        sink: &dyn ResultSink,
    ) -> Result<SearchOutcome, SearchError> {
        let authorization = self.authorize(token, &query).await;
        if !authorization.allowed {
            tracing::info!(
                kind = %query.kind(),
                reason = authorization.reason.as_deref().unwrap_or_default(),
                "search denied"
            );
            return Err(SearchError::Denied(authorization));
        }

        let cancel = self.begin();
        let mut session = SearchSession::new(query, authorization);
        let mut stream =
            self.dispatch(session.query(), LookupContext::new(token), cancel.clone());
        session.set_dispatched(stream.dispatched());
        tracing::debug!(
            session = %session.id(),
            kind = %session.query().kind(),
            adapters = stream.dispatched(),
            "search dispatched"
        );

        while let Some(result) = stream.next().await {
            if let Err(error) = session.record(result.clone()) {
                tracing::warn!(%error, "dropping duplicate result");
                continue;
            }
            sink.on_result(session.id(), &result);
        }
        session.mark_settled();
        sink.on_settled(&session);

        let summary = session.summary();
        tracing::info!(
            session = %session.id(),
            found = summary.found,
            errors = summary.errors,
            "search settled"
        );

        let cancelled = cancel.is_cancelled();
        let history_saved = if cancelled {
            tracing::info!(session = %session.id(), "search superseded, history skipped");
            false
        } else {
            self.finalize(token, &mut session).await.is_ok()
        };
        Ok(SearchOutcome {
            session,
            history_saved,
            cancelled,
        })
    }

    /// Install a fresh cancellation token, cancelling the previous one.
    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        match self.active.lock() {
            Ok(mut active) => {
                if let Some(previous) = active.replace(token.clone()) {
                    previous.cancel();
                }
            }
            Err(_) => tracing::warn!("active search lock poisoned, previous search not cancelled"),
        }
        token
    }
}
