//! Context-menu handoff configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_freshness_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandoffConfig {
    /// Age after which a pending search is no longer delivered.
    #[serde(default = "default_freshness_ms")]
    pub freshness_ms: u64,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            freshness_ms: default_freshness_ms(),
        }
    }
}

impl HandoffConfig {
    #[must_use]
    pub const fn freshness(&self) -> Duration {
        Duration::from_millis(self.freshness_ms)
    }
}
