//! Google account analysis through a self-hosted email lookup server.
//!
//! `POST {server}/search {"email"}` answers with the common envelope. A
//! failure whose message says the account was not found is a normal miss;
//! any other failure is an error.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde::Serialize;
use serde_json::{Value, json};

use crate::http::{join_url, settle};
use crate::proxied::post_action;
use crate::{LookupContext, SourceAdapter, error::SourceError};

#[derive(Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

pub struct EmailAdapter {
    http: reqwest::Client,
    server_url: String,
}

impl EmailAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into(),
        }
    }

    async fn fetch(&self, email: &str) -> Result<Option<Value>, SourceError> {
        let url = join_url(&self.server_url, "search");
        let envelope = post_action(&self.http, &url, &EmailRequest { email }).await?;
        if !envelope.success {
            let message = envelope.failure_message("Email analysis failed");
            if message.to_ascii_lowercase().contains("not found") {
                return Ok(None);
            }
            return Err(SourceError::Rejected(message));
        }
        let cached = envelope.cached.unwrap_or(false);
        Ok(envelope
            .into_data()
            .map(|data| json!({ "data": data, "cached": cached })))
    }
}

#[async_trait]
impl SourceAdapter for EmailAdapter {
    fn id(&self) -> &'static str {
        "ghunt"
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Email]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query.value()).await)
    }
}
