use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One past search as stored by the remote history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub search_type: String,
    pub query: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl HistoryRecord {
    /// Whether the store kept a result payload for this search.
    #[must_use]
    pub fn has_result(&self) -> bool {
        self.result.as_ref().is_some_and(|value| !value.is_null())
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC) or unix seconds.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| D::Error::custom(format!("invalid unix timestamp {n}"))),
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
            })
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{s}': {e}"))),
        other => Err(D::Error::custom(format!("unexpected timestamp {other}"))),
    }
}
