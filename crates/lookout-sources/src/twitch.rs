//! Twitch user lookup through the `ivr.fi` mirror API.
//!
//! The endpoint answers with a JSON array; an empty array means the login
//! does not exist.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde::{Deserialize, Serialize};

use crate::http::{check_response, join_url, settle};
use crate::{LookupContext, SourceAdapter, error::SourceError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TwitchUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, alias = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

pub struct TwitchAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl TwitchAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, username: &str) -> Result<Option<TwitchUser>, SourceError> {
        let url = join_url(
            &self.base_url,
            &format!("v2/twitch/user?login={}", urlencoding::encode(username)),
        );
        let Some(resp) = check_response(self.http.get(&url).send().await?).await? else {
            return Ok(None);
        };
        let users: Vec<TwitchUser> = resp.json().await?;
        Ok(users.into_iter().next())
    }
}

#[async_trait]
impl SourceAdapter for TwitchAdapter {
    fn id(&self) -> &'static str {
        "twitch"
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Username]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query.value()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_twitch_users() {
        let users: Vec<TwitchUser> = serde_json::from_str(
            r#"[{"id":"12826","login":"twitch","displayName":"Twitch","bio":"Hello","logo":"https://static-cdn.jtvnw.net/x.png","createdAt":"2007-05-22T10:39:54Z","banned":false}]"#,
        )
        .unwrap();
        assert_eq!(users[0].display_name.as_deref(), Some("Twitch"));
        assert_eq!(users[0].created_at.as_deref(), Some("2007-05-22T10:39:54Z"));

        let payload = serde_json::to_value(&users[0]).unwrap();
        assert_eq!(payload["display_name"], "Twitch");
    }
}
