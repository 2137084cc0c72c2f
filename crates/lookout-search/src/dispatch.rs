//! Concurrent fan-out of one query to its adapters.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use lookout_config::SourcesConfig;
use lookout_core::{Query, SourceResult};
use lookout_sources::{LookupContext, SourceAdapter};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Time limits applied to a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Per adapter, measured from its first poll.
    pub adapter: Duration,
    /// For the whole dispatch, measured from [`dispatch`].
    pub session: Duration,
}

impl Deadlines {
    #[must_use]
    pub const fn from_config(sources: &SourcesConfig) -> Self {
        Self {
            adapter: sources.adapter_timeout(),
            session: sources.session_timeout(),
        }
    }
}

impl Default for Deadlines {
    fn default() -> Self {
        Self::from_config(&SourcesConfig::default())
    }
}

/// Results of one dispatch in arrival order.
///
/// Yields exactly one item per adapter, then ends. Nothing runs until the
/// stream is polled.
#[must_use = "adapters only run while the stream is polled"]
pub struct DispatchStream {
    pending: FuturesUnordered<BoxFuture<'static, SourceResult>>,
    dispatched: usize,
}

impl DispatchStream {
    /// Number of adapters dispatched, i.e. the number of items this stream
    /// yields in total.
    #[must_use]
    pub const fn dispatched(&self) -> usize {
        self.dispatched
    }
}

impl Stream for DispatchStream {
    type Item = SourceResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.pending.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.pending.len();
        (len, Some(len))
    }
}

/// Start looking `query` up on every adapter.
///
/// Failures stay inside each adapter's result. An adapter that outlives its
/// own deadline or the session deadline settles as a timeout; cancelling
/// `cancel` settles every adapter still in flight as cancelled.
pub fn dispatch(
    query: &Query,
    adapters: Vec<Arc<dyn SourceAdapter>>,
    ctx: LookupContext,
    deadlines: Deadlines,
    cancel: CancellationToken,
) -> DispatchStream {
    let query = Arc::new(query.clone());
    let ctx = Arc::new(ctx);
    let session_deadline = Instant::now() + deadlines.session;

    let pending: FuturesUnordered<_> = adapters
        .into_iter()
        .map(|adapter| {
            let query = Arc::clone(&query);
            let ctx = Arc::clone(&ctx);
            let cancel = cancel.clone();
            let fut: BoxFuture<'static, SourceResult> = Box::pin(async move {
                run_adapter(
                    adapter.as_ref(),
                    &query,
                    &ctx,
                    deadlines.adapter,
                    session_deadline,
                    &cancel,
                )
                .await
            });
            fut
        })
        .collect();

    DispatchStream {
        dispatched: pending.len(),
        pending,
    }
}

async fn run_adapter(
    adapter: &dyn SourceAdapter,
    query: &Query,
    ctx: &LookupContext,
    adapter_timeout: Duration,
    session_deadline: Instant,
    cancel: &CancellationToken,
) -> SourceResult {
    let source = adapter.id();
    if cancel.is_cancelled() {
        return SourceResult::cancelled(source);
    }

    let lookup = tokio::time::timeout(adapter_timeout, adapter.lookup(query, ctx));
    let mut result = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!(source, "lookup cancelled");
            SourceResult::cancelled(source)
        }
        () = tokio::time::sleep_until(session_deadline) => {
            tracing::warn!(source, "session deadline reached before lookup finished");
            SourceResult::timeout(source)
        }
        outcome = lookup => outcome.unwrap_or_else(|_| {
            tracing::warn!(source, timeout_secs = adapter_timeout.as_secs(), "lookup timed out");
            SourceResult::timeout(source)
        }),
    };

    if result.source_id != source {
        tracing::debug!(source, reported = %result.source_id, "adapter reported a different id");
        source.clone_into(&mut result.source_id);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_core::{QueryKind, SourceStatus};
    use lookout_sources::speculative::{SpeculativeAdapter, SpeculativePlatform};

    #[tokio::test]
    async fn empty_dispatch_ends_immediately() {
        let query = Query::new(QueryKind::Username, "octocat").unwrap();
        let stream = dispatch(
            &query,
            Vec::new(),
            LookupContext::default(),
            Deadlines::default(),
            CancellationToken::new(),
        );
        assert_eq!(stream.dispatched(), 0);
        assert!(stream.collect::<Vec<_>>().await.is_empty());
    }

    #[tokio::test]
    async fn already_cancelled_token_settles_everything_as_cancelled() {
        let query = Query::new(QueryKind::Username, "octocat").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(SpeculativeAdapter::new(SpeculativePlatform::Twitter)),
            Arc::new(SpeculativeAdapter::new(SpeculativePlatform::Tiktok)),
        ];
        let results: Vec<_> = dispatch(
            &query,
            adapters,
            LookupContext::default(),
            Deadlines::default(),
            cancel,
        )
        .collect()
        .await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == SourceStatus::Error
            && r.error_detail.as_deref() == Some("cancelled")));
    }

    #[test]
    fn deadlines_follow_config() {
        let deadlines = Deadlines::from_config(&SourcesConfig {
            adapter_timeout_secs: 3,
            session_timeout_secs: 7,
            ..SourcesConfig::default()
        });
        assert_eq!(deadlines.adapter, Duration::from_secs(3));
        assert_eq!(deadlines.session, Duration::from_secs(7));
    }
}
