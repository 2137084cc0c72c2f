//! The set of adapters available to a search.

use std::sync::Arc;

use lookout_config::{GatewayConfig, SourcesConfig};
use lookout_core::QueryKind;

use crate::SourceAdapter;
use crate::email::EmailAdapter;
use crate::error::SourceError;
use crate::fullname::FullnameAdapter;
use crate::github::GithubAdapter;
use crate::gravatar::GravatarAdapter;
use crate::phone::PhoneAdapter;
use crate::playerdb::{GamingPlatform, PlayerDbAdapter};
use crate::proxied::{ProxiedAdapter, ProxiedPlatform};
use crate::reddit::RedditAdapter;
use crate::speculative::{SpeculativeAdapter, SpeculativePlatform};
use crate::twitch::TwitchAdapter;
use crate::whatsapp::WhatsappAdapter;

/// Adapters keyed by id, in registration order.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("adapters", &self.adapters.iter().map(|a| a.id()).collect::<Vec<_>>())
            .finish()
    }
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter, replacing any previous one with the same id.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        self.adapters.retain(|a| a.id() != adapter.id());
        self.adapters.push(adapter);
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, adapter: impl SourceAdapter + 'static) -> Self {
        self.register(Arc::new(adapter));
        self
    }

    /// Every built-in adapter the configuration allows.
    ///
    /// Adapters listed in `sources.disabled` are skipped, as are speculative
    /// candidates when `include_speculative` is off. Gateway-backed adapters
    /// need a configured gateway, and the email adapter needs a server URL.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn standard(sources: &SourcesConfig, gateway: &GatewayConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(gateway.user_agent.as_str())
            .timeout(sources.adapter_timeout())
            .build()
            .expect("reqwest client should build");

        let mut all: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(GravatarAdapter::new(http.clone(), &sources.gravatar_url)),
            Arc::new(GithubAdapter::new(http.clone(), &sources.github_url)),
            Arc::new(RedditAdapter::new(http.clone(), &sources.reddit_url)),
            Arc::new(TwitchAdapter::new(http.clone(), &sources.twitch_url)),
        ];
        for platform in GamingPlatform::ALL {
            all.push(Arc::new(PlayerDbAdapter::new(
                http.clone(),
                &sources.playerdb_url,
                platform,
            )));
        }
        if gateway.is_configured() {
            for platform in ProxiedPlatform::ALL {
                all.push(Arc::new(ProxiedAdapter::new(
                    http.clone(),
                    &gateway.url,
                    platform,
                )));
            }
        }
        if sources.include_speculative {
            for platform in SpeculativePlatform::ALL {
                all.push(Arc::new(SpeculativeAdapter::new(platform)));
            }
        }
        if sources.has_email_server() {
            all.push(Arc::new(EmailAdapter::new(
                http.clone(),
                &sources.email_server_url,
            )));
        }
        if gateway.is_configured() {
            all.push(Arc::new(PhoneAdapter::new(http.clone(), &gateway.url)));
            all.push(Arc::new(FullnameAdapter::new(
                http.clone(),
                gateway.fullname_url(),
            )));
        }
        all.push(Arc::new(WhatsappAdapter::new(http, &sources.whatsapp_db_url)));

        let mut registry = Self::new();
        for adapter in all {
            if sources.is_enabled(adapter.id()) {
                registry.register(adapter);
            } else {
                tracing::debug!(source = adapter.id(), "source disabled by configuration");
            }
        }
        registry
    }

    /// Adapters that handle `kind`, in registration order.
    #[must_use]
    pub fn for_kind(&self, kind: QueryKind) -> Vec<Arc<dyn SourceAdapter>> {
        self.adapters
            .iter()
            .filter(|a| a.kinds().contains(&kind))
            .cloned()
            .collect()
    }

    /// Restrict the registry to the given ids, in the order given.
    ///
    /// Ids are matched case-insensitively and repeats are ignored, so each
    /// adapter is dispatched at most once.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownSource`] for the first id that is not
    /// registered.
    pub fn only<S: AsRef<str>>(&self, ids: &[S]) -> Result<Self, SourceError> {
        let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            let adapter = self
                .adapters
                .iter()
                .find(|a| a.id().eq_ignore_ascii_case(id))
                .ok_or_else(|| SourceError::UnknownSource(id.to_string()))?;
            if !adapters.iter().any(|a| a.id() == adapter.id()) {
                adapters.push(Arc::clone(adapter));
            }
        }
        Ok(Self { adapters })
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.id()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
