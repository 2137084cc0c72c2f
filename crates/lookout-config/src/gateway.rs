//! Authorization and history gateway configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_ip_echo_url() -> String {
    String::from("https://api.ipify.org?format=json")
}

const fn default_request_timeout_secs() -> u64 {
    10
}

/// Cooldown assumed when the gateway asks to wait without saying how long.
const fn default_cooldown_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("lookout/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Primary RPC endpoint (`logSearch`, `saveToHistory`, `getHistory`,
    /// `getCredits`, and the proxied platform lookups).
    #[serde(default)]
    pub url: String,

    /// Endpoint serving `searchFullname`. Falls back to `url` when empty.
    #[serde(default)]
    pub secondary_url: String,

    /// Endpoint echoing the caller's public IP as `{"ip": "..."}`.
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_cooldown_secs")]
    pub default_cooldown_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            secondary_url: String::new(),
            ip_echo_url: default_ip_echo_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_cooldown_secs: default_cooldown_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl GatewayConfig {
    /// Check if the gateway endpoint is set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Endpoint for full-name searches.
    #[must_use]
    pub fn fullname_url(&self) -> &str {
        if self.secondary_url.is_empty() {
            &self.url
        } else {
            &self.secondary_url
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
