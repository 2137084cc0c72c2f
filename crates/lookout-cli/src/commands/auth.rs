use serde::Serialize;

use lookout_gateway::{Gateway, NewAccount};
use lookout_local::Credentials;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{LoginArgs, RegisterArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct LoginResponse {
    authenticated: bool,
    username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    credits: Option<i64>,
}

#[derive(Serialize)]
struct RegisterResponse {
    registered: bool,
    username: String,
}

#[derive(Serialize)]
struct LogoutResponse {
    cleared: bool,
}

#[derive(Serialize)]
struct StatusResponse {
    authenticated: bool,
    username: Option<String>,
    token_source: Option<&'static str>,
    gateway: Option<String>,
}

/// Create an account through the gateway and store its session token.
pub async fn register(
    args: &RegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let account = NewAccount::new(
        &args.username,
        &args.email,
        &args.password,
        &args.confirm_password,
        args.accept_terms,
    )?;
    let registration = ctx.gateway()?.register(&account).await?;

    let credentials = Credentials::new(registration.token, registration.username);
    ctx.credentials.store(&credentials)?;

    output(
        &RegisterResponse {
            registered: true,
            username: credentials.username,
        },
        flags.format,
    )
}

/// Verify the token against the gateway when one is configured, then store it.
pub async fn login(args: &LoginArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let token = args.token.trim();
    anyhow::ensure!(!token.is_empty(), "token must not be empty");

    let credits = if ctx.config.gateway.is_configured() {
        let credits = ctx
            .gateway()?
            .get_credits(token)
            .await
            .map_err(|error| anyhow::anyhow!("gateway rejected the token: {error}"))?;
        Some(credits)
    } else {
        tracing::warn!("no gateway configured; storing token without verification");
        None
    };

    let credentials = Credentials::new(token, args.username.trim());
    ctx.credentials.store(&credentials)?;

    output(
        &LoginResponse {
            authenticated: true,
            username: credentials.username,
            credits,
        },
        flags.format,
    )
}

pub fn logout(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.credentials.delete()?;
    output(&LogoutResponse { cleared: true }, flags.format)
}

pub fn status(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let loaded = ctx.credentials.load_with_source();
    let gateway = &ctx.config.gateway;
    let status = StatusResponse {
        authenticated: loaded.is_some(),
        username: loaded
            .as_ref()
            .map(|(c, _)| c.username.clone())
            .filter(|name| !name.is_empty()),
        token_source: loaded.map(|(_, source)| source.as_str()),
        gateway: gateway.is_configured().then(|| gateway.url.clone()),
    };
    output(&status, flags.format)
}
