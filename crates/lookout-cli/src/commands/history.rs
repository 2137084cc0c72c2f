use serde::Serialize;

use lookout_gateway::Gateway;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct HistoryRow {
    timestamp: String,
    search_type: String,
    query: String,
    has_result: bool,
}

pub async fn handle(args: &HistoryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let credentials = ctx.require_credentials()?;
    let mut records = ctx.gateway()?.get_history(&credentials.user_token).await?;
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    let rows = records
        .iter()
        .map(|record| HistoryRow {
            timestamp: record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            search_type: record.search_type.clone(),
            query: record.query.clone(),
            has_result: record.has_result(),
        })
        .collect::<Vec<_>>();
    output(&rows, flags.format)
}
