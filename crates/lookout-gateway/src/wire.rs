//! JSON shapes exchanged with the gateway.
//!
//! Every call is a `POST` of one JSON object whose `action` field selects the
//! operation.

use lookout_core::HistoryRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all_fields = "camelCase")]
pub(crate) enum Request<'a> {
    #[serde(rename = "logSearch")]
    LogSearch {
        token: &'a str,
        search_type: &'a str,
        query: &'a str,
        ip: &'a str,
        user_agent: &'a str,
    },
    #[serde(rename = "saveToHistory")]
    SaveToHistory {
        token: &'a str,
        search_type: &'a str,
        query: &'a str,
        result: &'a Value,
    },
    #[serde(rename = "getHistory")]
    GetHistory { token: &'a str },
    #[serde(rename = "getCredits")]
    GetCredits { token: &'a str },
    #[serde(rename = "register")]
    Register {
        username: &'a str,
        password: &'a str,
        email: &'a str,
        #[serde(rename = "accepted_terms")]
        accepted_terms: bool,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogSearchResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub credits_remaining: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub history: Option<Vec<HistoryRecord>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreditsResponse {
    pub success: bool,
    #[serde(default)]
    pub credits: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IpEcho {
    pub ip: String,
}
