//! Source adapter configuration: deadlines, toggles, and provider endpoints.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_adapter_timeout_secs() -> u64 {
    10
}

const fn default_session_timeout_secs() -> u64 {
    30
}

const fn default_include_speculative() -> bool {
    true
}

fn default_gravatar_url() -> String {
    String::from("https://en.gravatar.com")
}

fn default_github_url() -> String {
    String::from("https://api.github.com")
}

fn default_reddit_url() -> String {
    String::from("https://www.reddit.com")
}

fn default_twitch_url() -> String {
    String::from("https://api.ivr.fi")
}

fn default_playerdb_url() -> String {
    String::from("https://playerdb.co")
}

fn default_whatsapp_db_url() -> String {
    String::from("https://whatsapp-db.checkleaked.com")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Deadline for a single adapter before it settles as a timeout.
    #[serde(default = "default_adapter_timeout_secs")]
    pub adapter_timeout_secs: u64,

    /// Deadline for the whole fan-out of one search.
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,

    /// Whether platforms without a real lookup are reported as speculative.
    #[serde(default = "default_include_speculative")]
    pub include_speculative: bool,

    /// Adapter ids to skip (e.g. `["reddit", "whatsapp-db"]`).
    #[serde(default)]
    pub disabled: Vec<String>,

    #[serde(default = "default_gravatar_url")]
    pub gravatar_url: String,

    #[serde(default = "default_github_url")]
    pub github_url: String,

    #[serde(default = "default_reddit_url")]
    pub reddit_url: String,

    #[serde(default = "default_twitch_url")]
    pub twitch_url: String,

    /// Serves the Minecraft, Steam and Xbox player lookups.
    #[serde(default = "default_playerdb_url")]
    pub playerdb_url: String,

    #[serde(default = "default_whatsapp_db_url")]
    pub whatsapp_db_url: String,

    /// Email analysis server exposing `POST /search`. Email lookups are
    /// skipped when empty.
    #[serde(default)]
    pub email_server_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            adapter_timeout_secs: default_adapter_timeout_secs(),
            session_timeout_secs: default_session_timeout_secs(),
            include_speculative: default_include_speculative(),
            disabled: Vec::new(),
            gravatar_url: default_gravatar_url(),
            github_url: default_github_url(),
            reddit_url: default_reddit_url(),
            twitch_url: default_twitch_url(),
            playerdb_url: default_playerdb_url(),
            whatsapp_db_url: default_whatsapp_db_url(),
            email_server_url: String::new(),
        }
    }
}

impl SourcesConfig {
    #[must_use]
    pub const fn adapter_timeout(&self) -> Duration {
        Duration::from_secs(self.adapter_timeout_secs)
    }

    #[must_use]
    pub const fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Check whether an adapter id is enabled.
    #[must_use]
    pub fn is_enabled(&self, source_id: &str) -> bool {
        !self
            .disabled
            .iter()
            .any(|d| d.eq_ignore_ascii_case(source_id))
    }

    /// Check if the email analysis server is set.
    #[must_use]
    pub fn has_email_server(&self) -> bool {
        !self.email_server_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SourcesConfig::default();
        assert_eq!(config.adapter_timeout(), Duration::from_secs(10));
        assert_eq!(config.session_timeout(), Duration::from_secs(30));
        assert!(config.include_speculative);
        assert!(!config.has_email_server());
        assert_eq!(config.github_url, "https://api.github.com");
    }

    #[test]
    fn disabled_matching_ignores_case() {
        let config = SourcesConfig {
            disabled: vec!["Reddit".into()],
            ..SourcesConfig::default()
        };
        assert!(!config.is_enabled("reddit"));
        assert!(config.is_enabled("github"));
    }
}
