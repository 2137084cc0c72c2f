use anyhow::Context;
use lookout_config::LookoutConfig;
use lookout_gateway::GatewayClient;
use lookout_local::{CredentialStore, Credentials};

/// Configuration and credential access shared by every command.
pub struct AppContext {
    pub config: LookoutConfig,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn init() -> anyhow::Result<Self> {
        let config =
            LookoutConfig::load_with_dotenv().context("failed to load lookout configuration")?;
        let credentials = CredentialStore::standard()?;
        Ok(Self {
            config,
            credentials,
        })
    }

    /// A gateway client, or an error explaining how to configure one.
    pub fn gateway(&self) -> anyhow::Result<GatewayClient> {
        let gateway = self
            .config
            .require_gateway()
            .context("set gateway.url in .lookout/config.toml or LOOKOUT_GATEWAY__URL")?;
        Ok(GatewayClient::new(gateway))
    }

    /// Stored credentials, or an error pointing at `lko login`.
    pub fn require_credentials(&self) -> anyhow::Result<Credentials> {
        self.credentials
            .load()
            .context("not logged in. Run 'lko login --token <TOKEN>' first.")
    }
}
