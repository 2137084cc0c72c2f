//! # lookout-sources
//!
//! Identity source adapters for Lookout.
//!
//! Each adapter looks one identifier up on one provider and normalizes the
//! provider's JSON into a [`SourceResult`]:
//! - Gravatar, GitHub, Reddit, Twitch (username)
//! - `PlayerDB` for Minecraft, Steam and Xbox (username)
//! - Instagram, Threads and Snapchat through the gateway (username)
//! - Twitter, Facebook, YouTube and TikTok as speculative candidates (username)
//! - Email analysis server (email)
//! - Gateway phone lookup and the `WhatsApp` picture database (phone)
//! - Gateway full-name search (full name)
//!
//! "Not found" is a normal outcome, never an error. Adapters are stateless
//! and never depend on one another.

pub mod email;
pub mod fullname;
pub mod github;
pub mod gravatar;
pub mod phone;
pub mod playerdb;
pub mod proxied;
pub mod reddit;
pub mod registry;
pub mod speculative;
pub mod twitch;
pub mod whatsapp;

mod error;
mod http;

pub use error::SourceError;
pub use registry::SourceRegistry;

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};

/// Per-search data some adapters forward to first-party endpoints.
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    /// Session token of the user running the search.
    pub session_token: String,
}

impl LookupContext {
    #[must_use]
    pub fn new(session_token: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
        }
    }
}

/// One identity-data provider.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable identifier, unique within a registry (e.g. `github`).
    fn id(&self) -> &'static str;

    /// Query kinds this adapter can look up.
    fn kinds(&self) -> &'static [QueryKind];

    /// Look `query` up. Never fails: errors are folded into the result.
    async fn lookup(&self, query: &Query, ctx: &LookupContext) -> SourceResult;
}
