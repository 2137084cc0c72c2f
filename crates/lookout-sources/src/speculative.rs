//! Candidate profile URLs for platforms that cannot be queried.
//!
//! No request is made. The result is marked speculative and is never
//! counted as a match.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult};
use serde_json::json;

use crate::{LookupContext, SourceAdapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeculativePlatform {
    Twitter,
    Facebook,
    Youtube,
    Tiktok,
}

impl SpeculativePlatform {
    pub const ALL: [Self; 4] = [Self::Twitter, Self::Facebook, Self::Youtube, Self::Tiktok];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
        }
    }

    /// Where a profile with this username would live.
    #[must_use]
    pub fn profile_url(self, username: &str) -> String {
        let username = urlencoding::encode(username);
        match self {
            Self::Twitter => format!("https://x.com/{username}"),
            Self::Facebook => format!("https://www.facebook.com/{username}"),
            Self::Youtube => format!("https://www.youtube.com/@{username}"),
            Self::Tiktok => format!("https://www.tiktok.com/@{username}"),
        }
    }
}

pub struct SpeculativeAdapter {
    platform: SpeculativePlatform,
}

impl SpeculativeAdapter {
    #[must_use]
    pub const fn new(platform: SpeculativePlatform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl SourceAdapter for SpeculativeAdapter {
    fn id(&self) -> &'static str {
        self.platform.as_str()
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Username]
    }

    async fn lookup(&self, query: &Query, _ctx: &LookupContext) -> SourceResult {
        SourceResult::speculative(
            self.id(),
            json!({
                "username": query.value(),
                "profile_url": self.platform.profile_url(query.value()),
                "verified": false,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_core::SourceStatus;

    #[test]
    fn candidate_urls() {
        assert_eq!(
            SpeculativePlatform::Twitter.profile_url("jack"),
            "https://x.com/jack"
        );
        assert_eq!(
            SpeculativePlatform::Youtube.profile_url("mkbhd"),
            "https://www.youtube.com/@mkbhd"
        );
    }

    #[tokio::test]
    async fn lookup_is_speculative_and_unverified() {
        let adapter = SpeculativeAdapter::new(SpeculativePlatform::Tiktok);
        let query = Query::new(QueryKind::Username, "khaby.lame").unwrap();
        let result = adapter.lookup(&query, &LookupContext::default()).await;
        assert_eq!(result.status, SourceStatus::Speculative);
        assert!(!result.is_evidence());
        let payload = result.payload.unwrap();
        assert_eq!(payload["profile_url"], "https://www.tiktok.com/@khaby.lame");
        assert_eq!(payload["verified"], false);
    }
}
