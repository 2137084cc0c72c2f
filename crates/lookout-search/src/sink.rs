//! Consumers of search results as they arrive.

use std::sync::Mutex;

use lookout_core::{SearchSession, SessionId, SourceResult};
use tokio::sync::mpsc;

/// Receives results for one or more searches.
///
/// `on_result` is called once per dispatched adapter, then `on_settled`
/// exactly once. Calls for different sessions may interleave.
pub trait ResultSink: Send + Sync {
    fn on_result(&self, session: SessionId, result: &SourceResult);

    fn on_settled(&self, session: &SearchSession);
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    results: Mutex<Vec<(SessionId, SourceResult)>>,
    settled: Mutex<Vec<SessionId>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delivered result, in delivery order.
    #[must_use]
    pub fn results(&self) -> Vec<(SessionId, SourceResult)> {
        self.results
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Results delivered for one session.
    #[must_use]
    pub fn results_for(&self, session: SessionId) -> Vec<SourceResult> {
        self.results()
            .into_iter()
            .filter(|(id, _)| *id == session)
            .map(|(_, r)| r)
            .collect()
    }

    /// Sessions that reported settlement, in order.
    #[must_use]
    pub fn settled(&self) -> Vec<SessionId> {
        self.settled.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ResultSink for CollectingSink {
    fn on_result(&self, session: SessionId, result: &SourceResult) {
        if let Ok(mut results) = self.results.lock() {
            results.push((session, result.clone()));
        }
    }

    fn on_settled(&self, session: &SearchSession) {
        if let Ok(mut settled) = self.settled.lock() {
            settled.push(session.id());
        }
    }
}

/// Event forwarded by [`ChannelSink`].
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Result {
        session: SessionId,
        result: SourceResult,
    },
    Settled(Box<SearchSession>),
}

/// Forwards results to an unbounded channel, e.g. a rendering task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResultSink for ChannelSink {
    fn on_result(&self, session: SessionId, result: &SourceResult) {
        let event = SinkEvent::Result {
            session,
            result: result.clone(),
        };
        if self.tx.send(event).is_err() {
            tracing::trace!(%session, "result receiver dropped");
        }
    }

    fn on_settled(&self, session: &SearchSession) {
        if self
            .tx
            .send(SinkEvent::Settled(Box::new(session.clone())))
            .is_err()
        {
            tracing::trace!(session = %session.id(), "result receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_core::{AuthorizationResult, Query, QueryKind};

    #[tokio::test]
    async fn channel_sink_forwards_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        let query = Query::new(QueryKind::Username, "octocat").unwrap();
        let session = SearchSession::new(query, AuthorizationResult::allowed(None));

        sink.on_result(session.id(), &SourceResult::not_found("reddit"));
        sink.on_settled(&session);

        match rx.recv().await.unwrap() {
            SinkEvent::Result { session: id, result } => {
                assert_eq!(id, session.id());
                assert_eq!(result.source_id, "reddit");
            }
            SinkEvent::Settled(_) => panic!("expected a result first"),
        }
        assert!(matches!(rx.recv().await.unwrap(), SinkEvent::Settled(s) if s.id() == session.id()));
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.on_result(SessionId::new(), &SourceResult::not_found("steam"));
    }

    #[test]
    fn collecting_sink_filters_by_session() {
        let sink = CollectingSink::new();
        let (a, b) = (SessionId::new(), SessionId::new());
        sink.on_result(a, &SourceResult::not_found("github"));
        sink.on_result(b, &SourceResult::not_found("reddit"));
        assert_eq!(sink.results_for(a).len(), 1);
        assert_eq!(sink.results_for(b)[0].source_id, "reddit");
        assert!(sink.settled().is_empty());
    }
}
