//! Reddit account lookup via the public `about.json` endpoint.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde::{Deserialize, Serialize};

use crate::http::{check_response, join_url, settle};
use crate::{LookupContext, SourceAdapter, error::SourceError};

#[derive(Deserialize)]
struct AboutResponse {
    data: Option<RedditProfile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedditProfile {
    pub name: String,
    #[serde(default)]
    pub total_karma: i64,
    #[serde(default)]
    pub link_karma: i64,
    #[serde(default)]
    pub comment_karma: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_utc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_verified_email: Option<bool>,
    #[serde(default)]
    pub is_suspended: bool,
}

pub struct RedditAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl RedditAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, username: &str) -> Result<Option<RedditProfile>, SourceError> {
        let url = join_url(
            &self.base_url,
            &format!("user/{}/about.json", urlencoding::encode(username)),
        );
        let Some(resp) = check_response(self.http.get(&url).send().await?).await? else {
            return Ok(None);
        };
        let about: AboutResponse = resp.json().await?;
        Ok(about.data)
    }
}

#[async_trait]
impl SourceAdapter for RedditAdapter {
    fn id(&self) -> &'static str {
        "reddit"
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Username]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query.value()).await)
    }
}
