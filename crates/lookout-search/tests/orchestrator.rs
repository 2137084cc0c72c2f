//! End-to-end orchestration with an in-memory gateway and scripted adapters.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lookout_core::{
    AuthorizationResult, HistoryRecord, Query, QueryKind, SearchSession, SessionId, SourceResult,
    SourceStatus,
};
use lookout_config::GatewayConfig;
use lookout_core::DenialKind;
use lookout_gateway::{Gateway, GatewayClient, GatewayError, HistoryEntry};
use lookout_search::{
    ChannelSink, CollectingSink, Deadlines, ResultSink, SearchError, SearchOrchestrator, SinkEvent,
};
use lookout_sources::{LookupContext, SourceAdapter, SourceRegistry};
use pretty_assertions::assert_eq;
use serde_json::json;

type Journal = Arc<Mutex<Vec<String>>>;

fn note(journal: &Journal, line: impl Into<String>) {
    journal.lock().unwrap().push(line.into());
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeGateway {
    authorization: Result<AuthorizationResult, ()>,
    /// Queries refused with a cooldown regardless of `authorization`.
    refused: Vec<&'static str>,
    history_fails: bool,
    journal: Journal,
    saved: Mutex<Vec<HistoryEntry>>,
}

impl FakeGateway {
    fn allowing(journal: &Journal) -> Self {
        Self {
            authorization: Ok(AuthorizationResult::allowed(Some(10))),
            refused: Vec::new(),
            history_fails: false,
            journal: Arc::clone(journal),
            saved: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn log_search(
        &self,
        _token: &str,
        query: &Query,
    ) -> Result<AuthorizationResult, GatewayError> {
        note(&self.journal, format!("authorize {}", query.value()));
        if self.refused.contains(&query.value()) {
            return Ok(AuthorizationResult::denied("Please wait 30 seconds", Some(30)));
        }
        self.authorization.clone().map_err(|()| GatewayError::Api {
            status: 503,
            message: "down".into(),
        })
    }

    async fn save_to_history(&self, _token: &str, entry: &HistoryEntry) -> Result<(), GatewayError> {
        note(&self.journal, "history");
        self.saved.lock().unwrap().push(entry.clone());
        if self.history_fails {
            return Err(GatewayError::Rejected("history unavailable".into()));
        }
        Ok(())
    }

    async fn get_history(&self, _token: &str) -> Result<Vec<HistoryRecord>, GatewayError> {
        Ok(Vec::new())
    }

    async fn get_credits(&self, _token: &str) -> Result<i64, GatewayError> {
        Ok(10)
    }
}

#[derive(Clone, Copy)]
enum Script {
    Found,
    Missing,
    Fail,
}

struct ScriptedAdapter {
    id: &'static str,
    delay: Duration,
    script: Script,
    journal: Journal,
}

impl ScriptedAdapter {
    fn new(id: &'static str, delay_ms: u64, script: Script, journal: &Journal) -> Self {
        Self {
            id,
            delay: Duration::from_millis(delay_ms),
            script,
            journal: Arc::clone(journal),
        }
    }
}

#[async_trait]
impl SourceAdapter for ScriptedAdapter {
    fn id(&self) -> &'static str {
        self.id
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Username]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        note(&self.journal, format!("lookup {} {}", self.id, query.value()));
        tokio::time::sleep(self.delay).await;
        match self.script {
            Script::Found => SourceResult::found(self.id, json!({ "query": query.value() })),
            Script::Missing => SourceResult::not_found(self.id),
            Script::Fail => SourceResult::error(self.id, "boom"),
        }
    }
}

struct JournalSink {
    inner: CollectingSink,
    journal: Journal,
}

impl ResultSink for JournalSink {
    fn on_result(&self, session: SessionId, result: &SourceResult) {
        note(&self.journal, format!("result {}", result.source_id));
        self.inner.on_result(session, result);
    }

    fn on_settled(&self, session: &SearchSession) {
        note(&self.journal, "settled");
        self.inner.on_settled(session);
    }
}

fn username(value: &str) -> Query {
    Query::new(QueryKind::Username, value).unwrap()
}

fn orchestrator(gateway: FakeGateway, adapters: Vec<ScriptedAdapter>) -> (SearchOrchestrator, Arc<FakeGateway>) {
    let gateway = Arc::new(gateway);
    let mut registry = SourceRegistry::new();
    for adapter in adapters {
        registry.register(Arc::new(adapter));
    }
    let deadlines = Deadlines {
        adapter: Duration::from_secs(10),
        session: Duration::from_secs(30),
    };
    (
        SearchOrchestrator::new(Arc::clone(&gateway) as Arc<dyn Gateway>, registry, deadlines),
        gateway,
    )
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn denied_search_never_dispatches() {
    let journal = Journal::default();
    let gateway = FakeGateway {
        authorization: Ok(AuthorizationResult::denied("Please wait 30 seconds", Some(30))),
        ..FakeGateway::allowing(&journal)
    };
    let (orchestrator, gateway) = orchestrator(
        gateway,
        vec![ScriptedAdapter::new("github", 0, Script::Found, &journal)],
    );
    let sink = CollectingSink::new();

    let err = orchestrator
        .run("tok", username("octocat"), &sink)
        .await
        .unwrap_err();

    let denial = err.denial().unwrap();
    assert_eq!(denial.cooldown_seconds, Some(30));
    assert_eq!(*journal.lock().unwrap(), vec!["authorize octocat".to_string()]);
    assert!(sink.results().is_empty());
    assert!(sink.settled().is_empty());
    assert!(gateway.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_gateway_is_a_connectivity_denial() {
    let journal = Journal::default();
    let gateway = GatewayClient::new(&GatewayConfig {
        url: "http://127.0.0.1:1/api.php".to_string(),
        ip_echo_url: String::new(),
        ..GatewayConfig::default()
    });
    let registry =
        SourceRegistry::new().with(ScriptedAdapter::new("github", 0, Script::Found, &journal));
    let orchestrator = SearchOrchestrator::new(Arc::new(gateway), registry, Deadlines::default());

    let err = orchestrator
        .run("tok", username("octocat"), &CollectingSink::new())
        .await
        .unwrap_err();

    let denial = err.denial().unwrap();
    assert_eq!(denial.denial_kind(), Some(DenialKind::Connectivity));
    assert!(journal.lock().unwrap().is_empty());
}

#[tokio::test]
async fn gateway_api_failure_is_not_reported_as_connectivity() {
    let journal = Journal::default();
    let gateway = FakeGateway {
        authorization: Err(()),
        ..FakeGateway::allowing(&journal)
    };
    let (orchestrator, _) = orchestrator(
        gateway,
        vec![ScriptedAdapter::new("github", 0, Script::Found, &journal)],
    );

    let err = orchestrator
        .run("tok", username("octocat"), &CollectingSink::new())
        .await
        .unwrap_err();

    let denial = err.denial().unwrap();
    assert_ne!(denial.denial_kind(), Some(DenialKind::Connectivity));
    assert!(denial.reason.as_deref().unwrap().contains("503"));
    assert_eq!(*journal.lock().unwrap(), vec!["authorize octocat".to_string()]);
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn every_adapter_delivers_once_then_settles_once() {
    let journal = Journal::default();
    let (orchestrator, _) = orchestrator(
        FakeGateway::allowing(&journal),
        vec![
            ScriptedAdapter::new("github", 300, Script::Found, &journal),
            ScriptedAdapter::new("reddit", 100, Script::Missing, &journal),
            ScriptedAdapter::new("twitch", 200, Script::Fail, &journal),
        ],
    );
    let sink = CollectingSink::new();

    let outcome = orchestrator
        .run("tok", username("octocat"), &sink)
        .await
        .unwrap();

    let delivered: Vec<String> = sink
        .results_for(outcome.session.id())
        .into_iter()
        .map(|r| r.source_id)
        .collect();
    assert_eq!(delivered, vec!["reddit", "twitch", "github"]);
    assert_eq!(sink.settled(), vec![outcome.session.id()]);
    assert_eq!(outcome.session.dispatched(), 3);
    assert!(outcome.session.is_settled());
}

#[tokio::test(start_paused = true)]
async fn failing_adapter_does_not_block_siblings() {
    let journal = Journal::default();
    let (orchestrator, _) = orchestrator(
        FakeGateway::allowing(&journal),
        vec![
            ScriptedAdapter::new("twitch", 0, Script::Fail, &journal),
            ScriptedAdapter::new("github", 50, Script::Found, &journal),
        ],
    );

    let outcome = orchestrator
        .run("tok", username("octocat"), &CollectingSink::new())
        .await
        .unwrap();

    let session = &outcome.session;
    assert_eq!(session.result_for("twitch").unwrap().status, SourceStatus::Error);
    assert_eq!(session.result_for("github").unwrap().status, SourceStatus::Found);
    assert_eq!(session.summary().found_sources, vec!["github"]);
}

#[tokio::test(start_paused = true)]
async fn slow_adapter_times_out_alone() {
    let journal = Journal::default();
    let (orchestrator, _) = orchestrator(
        FakeGateway::allowing(&journal),
        vec![
            ScriptedAdapter::new("reddit", 60_000, Script::Found, &journal),
            ScriptedAdapter::new("github", 10, Script::Found, &journal),
        ],
    );

    let outcome = orchestrator
        .run("tok", username("octocat"), &CollectingSink::new())
        .await
        .unwrap();

    assert!(outcome.session.result_for("reddit").unwrap().is_timeout());
    assert!(outcome.session.result_for("github").unwrap().is_evidence());
}

#[tokio::test(start_paused = true)]
async fn session_deadline_bounds_the_dispatch() {
    let journal = Journal::default();
    let gateway = Arc::new(FakeGateway::allowing(&journal));
    let registry = SourceRegistry::new()
        .with(ScriptedAdapter::new("reddit", 5_000, Script::Found, &journal))
        .with(ScriptedAdapter::new("github", 10, Script::Found, &journal));
    let orchestrator = SearchOrchestrator::new(
        gateway,
        registry,
        Deadlines {
            adapter: Duration::from_secs(10),
            session: Duration::from_secs(2),
        },
    );

    let outcome = orchestrator
        .run("tok", username("octocat"), &CollectingSink::new())
        .await
        .unwrap();

    assert!(outcome.session.result_for("reddit").unwrap().is_timeout());
    assert_eq!(
        outcome.session.result_for("github").unwrap().status,
        SourceStatus::Found
    );
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn history_is_written_once_after_settlement() {
    let journal = Journal::default();
    let (orchestrator, gateway) = orchestrator(
        FakeGateway::allowing(&journal),
        vec![
            ScriptedAdapter::new("github", 20, Script::Found, &journal),
            ScriptedAdapter::new("reddit", 10, Script::Missing, &journal),
        ],
    );
    let sink = JournalSink {
        inner: CollectingSink::new(),
        journal: Arc::clone(&journal),
    };

    let mut outcome = orchestrator
        .run("tok", username("octocat"), &sink)
        .await
        .unwrap();
    assert!(outcome.history_saved);

    let lines = journal.lock().unwrap().clone();
    let settled = lines.iter().position(|l| l == "settled").unwrap();
    let history = lines.iter().position(|l| l == "history").unwrap();
    assert!(settled < history);
    assert_eq!(lines.iter().filter(|l| *l == "history").count(), 1);

    let saved = gateway.saved.lock().unwrap().clone();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].query, "octocat");
    assert_eq!(saved[0].result["summary"]["found"], 1);

    let again = orchestrator.finalize("tok", &mut outcome.session).await;
    assert!(matches!(again, Err(SearchError::AlreadyFinalized(_))));
    assert_eq!(gateway.saved.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn history_failure_keeps_results() {
    let journal = Journal::default();
    let gateway = FakeGateway {
        history_fails: true,
        ..FakeGateway::allowing(&journal)
    };
    let (orchestrator, _) = orchestrator(
        gateway,
        vec![ScriptedAdapter::new("github", 10, Script::Found, &journal)],
    );

    let outcome = orchestrator
        .run("tok", username("octocat"), &CollectingSink::new())
        .await
        .unwrap();

    assert!(!outcome.history_saved);
    assert_eq!(outcome.session.results().len(), 1);
}

#[tokio::test]
async fn finalize_refuses_unsettled_session() {
    let journal = Journal::default();
    let (orchestrator, gateway) = orchestrator(FakeGateway::allowing(&journal), Vec::new());
    let mut session = SearchSession::new(username("octocat"), AuthorizationResult::allowed(None));
    session.set_dispatched(2);

    let err = orchestrator.finalize("tok", &mut session).await.unwrap_err();

    assert!(matches!(err, SearchError::NotSettled(id) if id == session.id()));
    assert!(!session.is_finalized());
    assert!(gateway.saved.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Overlap
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn overlapping_searches_stay_isolated() {
    let journal = Journal::default();
    let (orchestrator, gateway) = orchestrator(
        FakeGateway::allowing(&journal),
        vec![
            ScriptedAdapter::new("github", 500, Script::Found, &journal),
            ScriptedAdapter::new("reddit", 700, Script::Found, &journal),
        ],
    );
    let (sink, mut rx) = ChannelSink::new();

    let first = orchestrator.run("tok", username("alice"), &sink);
    let second = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        orchestrator.run("tok", username("bob"), &sink).await
    };
    let (first, second) = tokio::join!(first, second);
    let (first, second) = (first.unwrap(), second.unwrap());
    drop(sink);

    assert_ne!(first.session.id(), second.session.id());
    assert!(first.cancelled);
    assert!(!first.history_saved);
    assert!(!second.cancelled);
    assert!(second.history_saved);

    // The newer search cancelled the older one's adapters.
    assert!(first
        .session
        .results()
        .iter()
        .all(|r| r.error_detail.as_deref() == Some("cancelled")));
    assert!(second
        .session
        .results()
        .iter()
        .all(|r| r.payload.as_ref().unwrap()["query"] == "bob"));

    let mut settled = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            SinkEvent::Result { session, result } => {
                if session == second.session.id() {
                    assert_eq!(result.status, SourceStatus::Found);
                } else {
                    assert_eq!(session, first.session.id());
                    assert_eq!(result.status, SourceStatus::Error);
                }
            }
            SinkEvent::Settled(session) => settled.push(session.id()),
        }
    }
    assert_eq!(settled, vec![first.session.id(), second.session.id()]);

    let saved = gateway.saved.lock().unwrap().clone();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].query, "bob");
}

#[tokio::test(start_paused = true)]
async fn refused_search_leaves_running_search_alone() {
    let journal = Journal::default();
    let gateway = FakeGateway {
        refused: vec!["bob"],
        ..FakeGateway::allowing(&journal)
    };
    let (orchestrator, gateway) = orchestrator(
        gateway,
        vec![ScriptedAdapter::new("github", 500, Script::Found, &journal)],
    );
    let sink = CollectingSink::new();

    let first = orchestrator.run("tok", username("alice"), &sink);
    let second = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        orchestrator.run("tok", username("bob"), &sink).await
    };
    let (first, second) = tokio::join!(first, second);

    let denial = second.unwrap_err();
    assert_eq!(denial.denial().unwrap().cooldown_seconds, Some(30));

    let first = first.unwrap();
    assert!(!first.cancelled);
    assert!(first.history_saved);
    assert_eq!(
        first.session.result_for("github").unwrap().status,
        SourceStatus::Found
    );
    assert_eq!(sink.settled(), vec![first.session.id()]);
    assert_eq!(gateway.saved.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_source_selection_still_settles() {
    let journal = Journal::default();
    let gateway = Arc::new(FakeGateway::allowing(&journal));
    let registry = SourceRegistry::new()
        .with(ScriptedAdapter::new("github", 10, Script::Found, &journal))
        .only(&["github", "GitHub"])
        .unwrap();
    let orchestrator = SearchOrchestrator::new(
        Arc::clone(&gateway) as Arc<dyn Gateway>,
        registry,
        Deadlines::default(),
    );
    let sink = CollectingSink::new();

    let outcome = orchestrator
        .run("tok", username("octocat"), &sink)
        .await
        .unwrap();

    assert_eq!(outcome.session.dispatched(), 1);
    assert!(outcome.session.is_settled());
    assert!(outcome.history_saved);
    assert_eq!(sink.results_for(outcome.session.id()).len(), 1);
}
