//! Social lookups proxied through the first-party gateway.
//!
//! Instagram, Threads and Snapchat have no usable public API, so the gateway
//! runs these lookups on our behalf: `POST {gateway} {"action", "username"}`.
//! A response without `success` and `data` means the account was not found.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde::Serialize;
use serde_json::Value;

use crate::http::{Envelope, check_response, settle};
use crate::{LookupContext, SourceAdapter, error::SourceError};

/// Platforms the gateway proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxiedPlatform {
    Instagram,
    Threads,
    Snapchat,
}

impl ProxiedPlatform {
    pub const ALL: [Self; 3] = [Self::Instagram, Self::Threads, Self::Snapchat];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Threads => "threads",
            Self::Snapchat => "snapchat",
        }
    }

    /// Gateway action name.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Instagram => "searchInstagram",
            Self::Threads => "searchThreads",
            Self::Snapchat => "searchSnapchat",
        }
    }
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    action: &'static str,
    username: &'a str,
}

/// POST a JSON action to a gateway endpoint and decode the common envelope.
pub(crate) async fn post_action<B: Serialize + Sync>(
    http: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<Envelope, SourceError> {
    let resp = http.post(url).json(body).send().await?;
    let Some(resp) = check_response(resp).await? else {
        return Err(SourceError::Api {
            status: 404,
            message: format!("gateway endpoint {url} not found"),
        });
    };
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| SourceError::Parse(e.to_string()))
}

pub struct ProxiedAdapter {
    http: reqwest::Client,
    gateway_url: String,
    platform: ProxiedPlatform,
}

impl ProxiedAdapter {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        gateway_url: impl Into<String>,
        platform: ProxiedPlatform,
    ) -> Self {
        Self {
            http,
            gateway_url: gateway_url.into(),
            platform,
        }
    }

    async fn fetch(&self, username: &str) -> Result<Option<Value>, SourceError> {
        let body = ProxyRequest {
            action: self.platform.action(),
            username,
        };
        let envelope = post_action(&self.http, &self.gateway_url, &body).await?;
        Ok(envelope.into_data())
    }
}

#[async_trait]
impl SourceAdapter for ProxiedAdapter {
    fn id(&self) -> &'static str {
        self.platform.as_str()
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Username]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query.value()).await)
    }
}
