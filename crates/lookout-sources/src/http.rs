//! Shared HTTP response helpers for source adapters.
//!
//! Centralizes status-code checks (404/410 as "not found", 429 rate limiting
//! with `Retry-After` parsing, non-success as [`SourceError::Api`]) and the
//! folding of adapter outcomes into a [`SourceResult`], so individual adapter
//! modules stay focused on request construction and response mapping.

use lookout_core::SourceResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SourceError;

/// Check an HTTP response for common outcomes.
///
/// - **404 / 410** → `Ok(None)`: the profile does not exist.
/// - **429 Too Many Requests** → [`SourceError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s).
/// - **Other non-success status** → [`SourceError::Api`].
/// - **Success** → `Ok(Some(resp))`.
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<Option<reqwest::Response>, SourceError> {
    let status = resp.status();
    if status == 404 || status == 410 {
        return Ok(None);
    }
    if status == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(SourceError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !status.is_success() {
        return Err(SourceError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(Some(resp))
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Fold an adapter outcome into a [`SourceResult`].
///
/// `Ok(Some(profile))` is found, `Ok(None)` is not found, and errors are
/// contained as `status = error` with the error text as detail.
pub fn settle<T: Serialize>(
    source_id: &str,
    outcome: Result<Option<T>, SourceError>,
) -> SourceResult {
    match outcome {
        Ok(Some(profile)) => match serde_json::to_value(profile) {
            Ok(payload) => SourceResult::found(source_id, payload),
            Err(e) => SourceResult::error(source_id, format!("parse error: {e}")),
        },
        Ok(None) => SourceResult::not_found(source_id),
        Err(error) => {
            tracing::debug!(source = source_id, %error, "lookup failed");
            SourceResult::error(source_id, error.to_string())
        }
    }
}

/// Response envelope shared by the gateway-proxied lookups and the email
/// analysis server: `{success, data, message | error, cached}`.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub cached: Option<bool>,
}

impl Envelope {
    /// Payload of a successful response, if it carries one.
    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        if self.success {
            self.data.filter(|d| !d.is_null())
        } else {
            None
        }
    }

    /// Provider's explanation for `success: false`.
    #[must_use]
    pub fn failure_message(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Join a base URL and a path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_core::SourceStatus;
    use serde_json::json;

    fn mock_response(status: u16) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body("")
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(status: u16, value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header("Retry-After", value)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn parse_retry_after_from_header() {
        let resp = mock_response_with_retry_after(429, "120");
        assert_eq!(parse_retry_after(&resp), 120);
    }

    #[test]
    fn parse_retry_after_non_numeric() {
        let resp = mock_response_with_retry_after(429, "not-a-number");
        assert_eq!(parse_retry_after(&resp), 60);
    }

    #[tokio::test]
    async fn check_response_not_found_is_none() {
        assert!(check_response(mock_response(404)).await.unwrap().is_none());
        assert!(check_response(mock_response(410)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn check_response_rate_limited_default() {
        let err = check_response(mock_response(429)).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::RateLimited {
                retry_after_secs: 60
            }
        ));
    }

    #[tokio::test]
    async fn check_response_api_error() {
        let err = check_response(mock_response(500)).await.unwrap_err();
        assert!(matches!(err, SourceError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200)).await.unwrap().is_some());
    }

    #[test]
    fn settle_maps_each_outcome() {
        let found = settle("github", Ok(Some(json!({ "login": "octocat" }))));
        assert_eq!(found.status, SourceStatus::Found);

        let missing = settle::<Value>("github", Ok(None));
        assert_eq!(missing.status, SourceStatus::NotFound);

        let failed = settle::<Value>("github", Err(SourceError::Parse("bad".into())));
        assert_eq!(failed.status, SourceStatus::Error);
        assert_eq!(failed.error_detail.as_deref(), Some("parse error: bad"));
    }

    #[test]
    fn envelope_data_requires_success() {
        let ok: Envelope = serde_json::from_value(json!({ "success": true, "data": { "a": 1 } })).unwrap();
        assert_eq!(ok.into_data(), Some(json!({ "a": 1 })));

        let null: Envelope = serde_json::from_value(json!({ "success": true, "data": null })).unwrap();
        assert_eq!(null.into_data(), None);

        let rejected: Envelope =
            serde_json::from_value(json!({ "success": false, "error": "quota" })).unwrap();
        assert_eq!(rejected.failure_message("failed"), "quota");
        assert_eq!(rejected.into_data(), None);
    }

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("https://a.b/", "/users/x"), "https://a.b/users/x");
        assert_eq!(join_url("https://a.b", "users/x"), "https://a.b/users/x");
    }
}
