use lookout_core::Query;
use lookout_local::HandoffMailbox;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TriggerArgs;
use crate::commands::search::run_search;
use crate::context::AppContext;

/// Search a text selection as the chosen kind.
///
/// The selection goes through the same one-shot handoff the context menu
/// uses, so a stale or already-consumed request is never searched.
pub async fn handle(args: &TriggerArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let classification = lookout_local::classify(&args.text);
    anyhow::ensure!(
        classification.suggested_kinds().contains(&args.kind),
        "'{}' cannot be searched as {} from a selection",
        classification.label,
        args.kind
    );

    let mailbox = HandoffMailbox::new(ctx.config.handoff.freshness());
    let id = mailbox.post(args.kind, classification.text);
    tracing::debug!(%id, kind = %args.kind, "selection handed off");

    let pending = mailbox.take(id)?;
    let query = Query::new(pending.kind, &pending.query)?;
    run_search(query, &args.sources, ctx, flags).await
}
