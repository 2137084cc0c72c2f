//! HTTP client for the gateway RPC endpoint.

use async_trait::async_trait;
use lookout_config::GatewayConfig;
use lookout_core::{AuthorizationResult, HistoryRecord, Query};
use serde::de::DeserializeOwned;

use crate::account::{NewAccount, Registration};
use crate::cooldown::parse_cooldown;
use crate::error::GatewayError;
use crate::wire::{
    CreditsResponse, HistoryResponse, IpEcho, LogSearchResponse, RegisterResponse, Request,
};
use crate::{Gateway, HistoryEntry};

/// IP reported to `logSearch` when the echo service is unavailable.
const UNKNOWN_IP: &str = "unknown";

/// Longest response excerpt kept in parse errors.
const BODY_EXCERPT_LEN: usize = 200;

/// HTTP client for the authorization/history gateway.
pub struct GatewayClient {
    http: reqwest::Client,
    url: String,
    ip_echo_url: String,
    user_agent: String,
    default_cooldown_secs: u64,
}

impl GatewayClient {
    /// Create a gateway client from configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .timeout(config.request_timeout())
                .build()
                .expect("reqwest client should build"),
            url: config.url.clone(),
            ip_echo_url: config.ip_echo_url.clone(),
            user_agent: config.user_agent.clone(),
            default_cooldown_secs: config.default_cooldown_secs,
        }
    }

    /// Public IP of this client as seen by the echo service, or `"unknown"`.
    pub async fn client_ip(&self) -> String {
        if self.ip_echo_url.is_empty() {
            return UNKNOWN_IP.to_string();
        }
        let echo = async {
            let resp = check_response(self.http.get(&self.ip_echo_url).send().await?).await?;
            Ok::<_, GatewayError>(resp.json::<IpEcho>().await?.ip)
        };
        match echo.await {
            Ok(ip) if !ip.is_empty() => ip,
            Ok(_) => UNKNOWN_IP.to_string(),
            Err(error) => {
                tracing::debug!(%error, "ip echo failed");
                UNKNOWN_IP.to_string()
            }
        }
    }

    /// Create an account and obtain its session token.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Rejected`] with the gateway's message when the
    /// account cannot be created, [`GatewayError::Parse`] when a successful
    /// answer carries no token, and transport errors otherwise.
    pub async fn register(&self, account: &NewAccount) -> Result<Registration, GatewayError> {
        let request = Request::Register {
            username: account.username(),
            password: account.password(),
            email: account.email(),
            accepted_terms: true,
        };
        let resp: RegisterResponse = self.post(&request).await?;
        if !resp.success {
            return Err(GatewayError::Rejected(resp.message.unwrap_or_else(|| {
                String::from("Error during account creation")
            })));
        }
        let token = resp
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| GatewayError::Parse(String::from("token missing from registration")))?;
        tracing::debug!(username = account.username(), "account created");
        Ok(Registration {
            token,
            username: resp.username.unwrap_or_else(|| account.username().to_string()),
        })
    }

    async fn post<T: DeserializeOwned>(&self, request: &Request<'_>) -> Result<T, GatewayError> {
        let resp = check_response(self.http.post(&self.url).json(request).send().await?).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
            GatewayError::Parse(format!("{e} in response: {excerpt}"))
        })
    }

    fn interpret_log_search(&self, resp: LogSearchResponse) -> AuthorizationResult {
        if resp.success {
            return AuthorizationResult::allowed(resp.credits_remaining);
        }
        let message = resp
            .message
            .unwrap_or_else(|| String::from("search not authorized"));
        let cooldown = parse_cooldown(&message, self.default_cooldown_secs);
        let mut result = AuthorizationResult::denied(message, cooldown);
        result.credits_remaining = resp.credits_remaining;
        result
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn log_search(
        &self,
        token: &str,
        query: &Query,
    ) -> Result<AuthorizationResult, GatewayError> {
        let ip = self.client_ip().await;
        let label = query.history_label();
        let request = Request::LogSearch {
            token,
            search_type: query.kind().wire_name(),
            query: &label,
            ip: &ip,
            user_agent: &self.user_agent,
        };
        let resp: LogSearchResponse = self.post(&request).await?;
        Ok(self.interpret_log_search(resp))
    }

    async fn save_to_history(&self, token: &str, entry: &HistoryEntry) -> Result<(), GatewayError> {
        let request = Request::SaveToHistory {
            token,
            search_type: entry.kind.wire_name(),
            query: &entry.query,
            result: &entry.result,
        };
        check_response(self.http.post(&self.url).json(&request).send().await?).await?;
        Ok(())
    }

    async fn get_history(&self, token: &str) -> Result<Vec<HistoryRecord>, GatewayError> {
        let resp: HistoryResponse = self.post(&Request::GetHistory { token }).await?;
        match (resp.success, resp.history) {
            (true, Some(history)) => Ok(history),
            (true, None) => Ok(Vec::new()),
            (false, _) => Err(GatewayError::Rejected(
                resp.message.unwrap_or_else(|| String::from("No history found")),
            )),
        }
    }

    async fn get_credits(&self, token: &str) -> Result<i64, GatewayError> {
        let resp: CreditsResponse = self.post(&Request::GetCredits { token }).await?;
        match (resp.success, resp.credits) {
            (true, Some(credits)) => Ok(credits),
            (true, None) => Err(GatewayError::Parse(String::from(
                "credits missing from successful response",
            ))),
            (false, _) => Err(GatewayError::Rejected(
                resp.message
                    .unwrap_or_else(|| String::from("credits unavailable")),
            )),
        }
    }
}

/// Map non-success statuses to [`GatewayError::Api`].
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    if !resp.status().is_success() {
        return Err(GatewayError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
