//! Phone number analysis through the gateway's `searchNumber` action.

use async_trait::async_trait;
use lookout_core::{Query, QueryKind, SourceResult, query::AUX_COUNTRY_CODE};
use serde::Serialize;
use serde_json::{Value, json};

use crate::http::settle;
use crate::proxied::post_action;
use crate::{LookupContext, SourceAdapter, error::SourceError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NumberRequest<'a> {
    action: &'static str,
    token: &'a str,
    phone_number: &'a str,
    country_code: &'a str,
}

pub struct PhoneAdapter {
    http: reqwest::Client,
    gateway_url: String,
}

impl PhoneAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, gateway_url: impl Into<String>) -> Self {
        Self {
            http,
            gateway_url: gateway_url.into(),
        }
    }

    async fn fetch(&self, query: &Query, token: &str) -> Result<Option<Value>, SourceError> {
        let body = NumberRequest {
            action: "searchNumber",
            token,
            phone_number: query.value(),
            country_code: query.aux(AUX_COUNTRY_CODE).unwrap_or_default(),
        };
        let envelope = post_action(&self.http, &self.gateway_url, &body).await?;
        if !envelope.success {
            return Err(SourceError::Rejected(
                envelope.failure_message("Phone number search failed"),
            ));
        }
        let cached = envelope.cached.unwrap_or(false);
        Ok(envelope
            .into_data()
            .map(|data| json!({ "data": data, "cached": cached })))
    }
}

#[async_trait]
impl SourceAdapter for PhoneAdapter {
    fn id(&self) -> &'static str {
        "phone-lookup"
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Phone]
    }

    async fn lookup(&self, query: &Query, ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query, &ctx.session_token).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_fields() {
        let body = serde_json::to_value(NumberRequest {
            action: "searchNumber",
            token: "tok",
            phone_number: "33612345678",
            country_code: "33",
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "action": "searchNumber",
                "token": "tok",
                "phoneNumber": "33612345678",
                "countryCode": "33",
            })
        );
    }
}
