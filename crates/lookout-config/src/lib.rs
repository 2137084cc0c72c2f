//! # lookout-config
//!
//! Layered configuration loading for Lookout using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LOOKOUT_*` prefix, `__` as separator)
//! 2. Project-level `.lookout/config.toml`
//! 3. User-level `~/.config/lookout/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LOOKOUT_GATEWAY__URL` -> `gateway.url`,
//! `LOOKOUT_SOURCES__ADAPTER_TIMEOUT_SECS` -> `sources.adapter_timeout_secs`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use lookout_config::LookoutConfig;
//!
//! let config = LookoutConfig::load_with_dotenv().expect("config");
//!
//! if config.gateway.is_configured() {
//!     println!("Gateway: {}", config.gateway.url);
//! }
//! ```

mod error;
mod gateway;
mod handoff;
mod sources;

pub use error::ConfigError;
pub use gateway::GatewayConfig;
pub use handoff::HandoffConfig;
pub use sources::SourcesConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LookoutConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub handoff: HandoffConfig,
}

impl LookoutConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, and
    /// [`ConfigError::InvalidValue`] if a deadline is zero.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".lookout/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("LOOKOUT_").split("__"))
    }

    /// Reject values that would make every search fail immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero deadlines.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero_checks = [
            ("sources.adapter_timeout_secs", self.sources.adapter_timeout_secs),
            ("sources.session_timeout_secs", self.sources.session_timeout_secs),
            ("gateway.request_timeout_secs", self.gateway.request_timeout_secs),
            ("handoff.freshness_ms", self.handoff.freshness_ms),
        ];
        for (field, value) in zero_checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Fail with [`ConfigError::NotConfigured`] when no gateway URL is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for the `gateway` section.
    pub fn require_gateway(&self) -> Result<&GatewayConfig, ConfigError> {
        if self.gateway.is_configured() {
            Ok(&self.gateway)
        } else {
            Err(ConfigError::NotConfigured {
                section: "gateway".to_string(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lookout").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = LookoutConfig::default();
        assert!(!config.gateway.is_configured());
        assert_eq!(config.sources.adapter_timeout_secs, 10);
        assert_eq!(config.handoff.freshness_ms, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn figment_builds_without_files() {
        let config: LookoutConfig = LookoutConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.sources.session_timeout_secs, 30);
    }

    #[test]
    fn zero_deadline_is_invalid() {
        let mut config = LookoutConfig::default();
        config.sources.adapter_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sources.adapter_timeout_secs"));
    }

    #[test]
    fn require_gateway_reports_section() {
        let err = LookoutConfig::default().require_gateway().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section } if section == "gateway"));
    }
}
