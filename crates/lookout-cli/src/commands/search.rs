use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use lookout_core::query::{AUX_COUNTRY_CODE, AUX_POSTAL_CODE, AUX_SUB_TYPE};
use lookout_core::{
    AuthorizationResult, DenialKind, Query, QueryKind, ResultsSummary, SessionId, SourceResult,
    SourceStatus,
};
use lookout_gateway::Gateway;
use lookout_search::{Deadlines, SearchError, SearchOrchestrator, SearchOutcome};
use lookout_sources::SourceRegistry;

use crate::cli::root_commands::SourceArgs;
use crate::cli::{GlobalFlags, OutputFormat, SearchCommands};
use crate::context::AppContext;
use crate::output::{output, output_table};
use crate::terminal_sink::TerminalSink;

#[derive(Serialize)]
struct SearchReport<'a> {
    session: SessionId,
    kind: QueryKind,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    credits_remaining: Option<i64>,
    history_saved: bool,
    summary: ResultsSummary,
    results: &'a [SourceResult],
}

pub async fn handle(
    target: &SearchCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let (query, sources) = build_query(target)?;
    run_search(query, sources, ctx, flags).await
}

/// Validate command arguments into a query plus its source selection.
pub fn build_query(target: &SearchCommands) -> anyhow::Result<(Query, &SourceArgs)> {
    let mut auxiliary = BTreeMap::new();
    let (kind, value, sources) = match target {
        SearchCommands::Username(args) => (QueryKind::Username, &args.value, &args.sources),
        SearchCommands::Email(args) => (QueryKind::Email, &args.value, &args.sources),
        SearchCommands::Phone(args) => {
            if let Some(code) = &args.country_code {
                auxiliary.insert(AUX_COUNTRY_CODE.to_string(), code.clone());
            }
            (QueryKind::Phone, &args.value, &args.sources)
        }
        SearchCommands::Fullname(args) => {
            auxiliary.insert(AUX_SUB_TYPE.to_string(), args.r#type.clone());
            if let Some(postal_code) = &args.postal_code {
                auxiliary.insert(AUX_POSTAL_CODE.to_string(), postal_code.clone());
            }
            (QueryKind::Fullname, &args.value, &args.sources)
        }
    };
    let query = Query::parse(kind, value, auxiliary)?;
    Ok((query, sources))
}

/// Authorize, fan out and report one search.
pub async fn run_search(
    query: Query,
    sources: &SourceArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let credentials = ctx.require_credentials()?;
    let gateway: Arc<dyn Gateway> = Arc::new(ctx.gateway()?);
    let registry = select_sources(ctx, sources)?;
    anyhow::ensure!(
        !registry.for_kind(query.kind()).is_empty(),
        "no enabled source handles {} searches",
        query.kind()
    );

    let orchestrator = Arc::new(SearchOrchestrator::new(
        gateway,
        registry,
        Deadlines::from_config(&ctx.config.sources),
    ));

    let interrupt = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling pending sources");
                orchestrator.cancel_active();
            }
        })
    };

    let sink = TerminalSink::new(&query.history_label());
    let outcome = orchestrator
        .run(&credentials.user_token, query, &sink)
        .await;
    interrupt.abort();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(SearchError::Denied(auth)) => {
            sink.abandon("denied");
            anyhow::bail!(denial_message(&auth));
        }
        Err(error) => {
            sink.abandon("failed");
            return Err(error.into());
        }
    };
    if outcome.cancelled {
        tracing::warn!("search interrupted, partial results were not saved to history");
    } else if !outcome.history_saved {
        tracing::warn!("search completed but was not saved to history");
    }

    report(&outcome, flags)
}

fn select_sources(ctx: &AppContext, sources: &SourceArgs) -> anyhow::Result<SourceRegistry> {
    let mut config = ctx.config.sources.clone();
    if sources.no_speculative {
        config.include_speculative = false;
    }
    let registry = SourceRegistry::standard(&config, &ctx.config.gateway);
    if sources.only.is_empty() {
        Ok(registry)
    } else {
        Ok(registry.only(&sources.only)?)
    }
}

fn report(outcome: &SearchOutcome, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = &outcome.session;
    if flags.format == OutputFormat::Table {
        let rows = session
            .results()
            .iter()
            .map(|result| {
                vec![
                    result.source_id.clone(),
                    result.status.as_str().to_string(),
                    detail_cell(result),
                ]
            })
            .collect::<Vec<_>>();
        output_table(&["source", "status", "detail"], &rows);
        return Ok(());
    }

    let query = session.query().history_label();
    output(
        &SearchReport {
            session: session.id(),
            kind: session.query().kind(),
            query: &query,
            credits_remaining: session.authorization().credits_remaining,
            history_saved: outcome.history_saved,
            summary: session.summary(),
            results: session.results(),
        },
        flags.format,
    )
}

/// Short description of a result for table output.
fn detail_cell(result: &SourceResult) -> String {
    if let Some(detail) = &result.error_detail {
        return detail.clone();
    }
    let Some(payload) = &result.payload else {
        return String::from("-");
    };
    let link = ["profile_url", "html_url", "url", "image_url"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(|v| v.as_str()));
    match (result.status, link) {
        (SourceStatus::Speculative, Some(url)) => format!("unverified: {url}"),
        (_, Some(url)) => url.to_string(),
        _ => serde_json::to_string(payload).unwrap_or_default(),
    }
}

/// User-facing explanation of a refused search.
pub fn denial_message(auth: &AuthorizationResult) -> String {
    let reason = auth.reason.as_deref().unwrap_or("no reason given");
    match auth.denial_kind() {
        Some(DenialKind::Cooldown) => format!(
            "search denied: {reason} (retry in {}s)",
            auth.cooldown_seconds.unwrap_or_default()
        ),
        Some(DenialKind::Connectivity) => {
            String::from("search denied: the gateway could not be reached, nothing was charged")
        }
        Some(DenialKind::InsufficientCredits) => {
            format!("search denied: {reason}. Check your balance with 'lko credits'.")
        }
        Some(DenialKind::InvalidToken) => {
            format!("search denied: {reason}. Run 'lko login' again.")
        }
        _ => format!("search denied: {reason}"),
    }
}
