//! Gravatar profile lookup.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde::{Deserialize, Serialize};

use crate::http::{check_response, join_url, settle};
use crate::{LookupContext, SourceAdapter, error::SourceError};

#[derive(Deserialize)]
struct GravatarResponse {
    #[serde(default)]
    entry: Vec<GravatarProfile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GravatarProfile {
    #[serde(default, alias = "preferredUsername")]
    pub preferred_username: Option<String>,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default, alias = "profileUrl")]
    pub profile_url: Option<String>,
    #[serde(default, alias = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
}

pub struct GravatarAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl GravatarAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, username: &str) -> Result<Option<GravatarProfile>, SourceError> {
        let url = join_url(
            &self.base_url,
            &format!("{}.json", urlencoding::encode(username)),
        );
        let Some(resp) = check_response(self.http.get(&url).send().await?).await? else {
            return Ok(None);
        };
        let data: GravatarResponse = resp.json().await?;
        Ok(data.entry.into_iter().next())
    }
}

#[async_trait]
impl SourceAdapter for GravatarAdapter {
    fn id(&self) -> &'static str {
        "gravatar"
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Username]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query.value()).await)
    }
}
