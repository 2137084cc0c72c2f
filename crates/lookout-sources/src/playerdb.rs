//! Gaming account lookups through `PlayerDB`.
//!
//! One endpoint serves several platforms:
//! `GET /api/player/{platform}/{username}`. Unknown players come back as
//! 400 or 404 with `success: false`.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde::{Deserialize, Serialize};

use crate::http::{check_response, join_url, settle};
use crate::{LookupContext, SourceAdapter, error::SourceError};

/// Platforms served by `PlayerDB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamingPlatform {
    Minecraft,
    Steam,
    Xbox,
}

impl GamingPlatform {
    pub const ALL: [Self; 3] = [Self::Minecraft, Self::Steam, Self::Xbox];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minecraft => "minecraft",
            Self::Steam => "steam",
            Self::Xbox => "xbox",
        }
    }
}

#[derive(Deserialize)]
struct PlayerDbResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<PlayerDbData>,
}

#[derive(Deserialize)]
struct PlayerDbData {
    player: Option<Player>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

pub struct PlayerDbAdapter {
    http: reqwest::Client,
    base_url: String,
    platform: GamingPlatform,
}

impl PlayerDbAdapter {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        platform: GamingPlatform,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            platform,
        }
    }

    async fn fetch(&self, username: &str) -> Result<Option<Player>, SourceError> {
        let url = join_url(
            &self.base_url,
            &format!(
                "api/player/{}/{}",
                self.platform.as_str(),
                urlencoding::encode(username)
            ),
        );
        let resp = self.http.get(&url).send().await?;

        // PlayerDB reports unknown players as a client error.
        if resp.status() == 400 {
            return Ok(None);
        }
        let Some(resp) = check_response(resp).await? else {
            return Ok(None);
        };

        let data: PlayerDbResponse = resp.json().await?;
        if !data.success {
            return Ok(None);
        }
        Ok(data.data.and_then(|d| d.player))
    }
}

#[async_trait]
impl SourceAdapter for PlayerDbAdapter {
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
