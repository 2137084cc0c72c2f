//! GitHub profile lookup by exact username.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde::{Deserialize, Serialize};

use crate::http::{check_response, join_url, settle};
use crate::{LookupContext, SourceAdapter, error::SourceError};

#[derive(Debug, Serialize, Deserialize)]
pub struct GithubProfile {
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

pub struct GithubAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl GithubAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, username: &str) -> Result<Option<GithubProfile>, SourceError> {
        let url = join_url(
            &self.base_url,
            &format!("users/{}", urlencoding::encode(username)),
        );
        let Some(resp) = check_response(self.http.get(&url).send().await?).await? else {
            return Ok(None);
        };
        Ok(Some(resp.json().await?))
    }
}

#[async_trait]
impl SourceAdapter for GithubAdapter {
    fn id(&self) -> &'static str {
        "github"
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Username]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query.value()).await)
    }
}
