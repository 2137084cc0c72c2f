//! Full-name search on the secondary gateway.
//!
//! Two backends sit behind `searchFullname`: the INSEE company register
//! (`insee`) and a Facebook leak index (`facebook`). An INSEE response with
//! no establishments is treated as not found.

use async_trait::async_trait;
use lookout_core::{
    Query, QueryKind, SourceResult,
    query::{AUX_POSTAL_CODE, AUX_SUB_TYPE},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::http::settle;
use crate::proxied::post_action;
use crate::{LookupContext, SourceAdapter, error::SourceError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FullnameRequest<'a> {
    action: &'static str,
    #[serde(rename = "type")]
    sub_type: &'a str,
    query: &'a str,
    postal_code: &'a str,
    token: &'a str,
}

pub struct FullnameAdapter {
    http: reqwest::Client,
    gateway_url: String,
}

impl FullnameAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, gateway_url: impl Into<String>) -> Self {
        Self {
            http,
            gateway_url: gateway_url.into(),
        }
    }

    async fn fetch(&self, query: &Query, token: &str) -> Result<Option<Value>, SourceError> {
        let sub_type = query.aux(AUX_SUB_TYPE).unwrap_or("insee");
        let body = FullnameRequest {
            action: "searchFullname",
            sub_type,
            query: query.value(),
            postal_code: query.aux(AUX_POSTAL_CODE).unwrap_or_default(),
            token,
        };
        let envelope = post_action(&self.http, &self.gateway_url, &body).await?;
        if !envelope.success {
            return Err(SourceError::Rejected(
                envelope.failure_message("Full name search failed"),
            ));
        }
        Ok(envelope
            .into_data()
            .filter(|data| !is_empty_register(sub_type, data))
            .map(|data| json!({ "type": sub_type, "data": data })))
    }
}

fn is_empty_register(sub_type: &str, data: &Value) -> bool {
    sub_type == "insee"
        && data
            .get("etablissements")
            .and_then(Value::as_array)
            .is_none_or(Vec::is_empty)
}

#[async_trait]
impl SourceAdapter for FullnameAdapter {
    fn id(&self) -> &'static str {
        "fullname"
    }

    fn kinds(&self) -> &'static [QueryKind] {
        &[QueryKind::Fullname]
    }

    async fn lookup(&self, query: &Query, ctx: &LookupContext) -> SourceResult {
        settle(self.id(), self.fetch(query, &ctx.session_token).await)
    }
}
