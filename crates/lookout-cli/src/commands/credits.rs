use serde::Serialize;

use lookout_gateway::Gateway;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct CreditsResponse {
    credits: i64,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let credentials = ctx.require_credentials()?;
    let credits = ctx.gateway()?.get_credits(&credentials.user_token).await?;
    output(&CreditsResponse { credits }, flags.format)
}
