pub mod auth;
pub mod classify;
pub mod credits;
pub mod history;
pub mod search;
pub mod trigger;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Register(args) => auth::register(&args, ctx, flags).await,
        Commands::Login(args) => auth::login(&args, ctx, flags).await,
        Commands::Logout => auth::logout(ctx, flags),
        Commands::Status => auth::status(ctx, flags),
        Commands::Credits => credits::handle(ctx, flags).await,
        Commands::History(args) => history::handle(&args, ctx, flags).await,
        Commands::Search { target } => search::handle(&target, ctx, flags).await,
        Commands::Classify(args) => classify::handle(&args, flags),
        Commands::Trigger(args) => trigger::handle(&args, ctx, flags).await,
    }
}
