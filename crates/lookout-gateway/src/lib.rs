//! # lookout-gateway
//!
//! Client for the remote authorization and history gateway.
//!
//! The gateway is a single JSON-over-HTTP endpoint. It validates the session
//! token, enforces the cooldown between searches, charges one credit per
//! authorized search, and stores search history:
//! - `logSearch`: authorize and charge a search
//! - `saveToHistory`: best-effort history write
//! - `getHistory`: past searches for a token
//! - `getCredits`: remaining credit balance
//! - `register`: create an account and obtain its session token

pub mod account;

mod client;
mod cooldown;
mod error;
mod wire;

pub use account::{NewAccount, Registration};
pub use client::GatewayClient;
pub use cooldown::parse_cooldown;
pub use error::GatewayError;

use async_trait::async_trait;
use lookout_core::{AuthorizationResult, HistoryRecord, Query, QueryKind};
use serde_json::Value;

/// One history write: the searched kind, its label, and the stored result.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub kind: QueryKind,
    pub query: String,
    pub result: Value,
}

/// Operations the search orchestrator needs from the gateway.
///
/// Implemented by [`GatewayClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Authorize and charge one search.
    ///
    /// Gateway rejections are returned as `Ok` with `allowed == false`; only
    /// transport and parse failures are errors.
    async fn log_search(
        &self,
        token: &str,
        query: &Query,
    ) -> Result<AuthorizationResult, GatewayError>;

    /// Persist one completed search.
    async fn save_to_history(&self, token: &str, entry: &HistoryEntry) -> Result<(), GatewayError>;

    async fn get_history(&self, token: &str) -> Result<Vec<HistoryRecord>, GatewayError>;

    async fn get_credits(&self, token: &str) -> Result<i64, GatewayError>;
}
