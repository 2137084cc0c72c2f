//! Search queries and their superficial validation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Auxiliary key holding the dialing prefix for phone searches.
pub const AUX_COUNTRY_CODE: &str = "country_code";
/// Auxiliary key holding the postal code for full-name searches.
pub const AUX_POSTAL_CODE: &str = "postal_code";
/// Auxiliary key selecting the full-name backend (`insee` or `facebook`).
pub const AUX_SUB_TYPE: &str = "sub_type";

const DEFAULT_FULLNAME_SUB_TYPE: &str = "insee";
const FULLNAME_SUB_TYPES: &[&str] = &["insee", "facebook"];

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.\-]+$").expect("valid username regex"));

/// Email shape accepted by the search form and the context menu.
pub static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

// ---------------------------------------------------------------------------
// QueryKind
// ---------------------------------------------------------------------------

/// The kind of identifier a user submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Username,
    Email,
    Phone,
    Fullname,
}

impl QueryKind {
    pub const ALL: [Self; 4] = [Self::Username, Self::Email, Self::Phone, Self::Fullname];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Fullname => "fullname",
        }
    }

    /// Search type name used by the gateway's `logSearch` and history APIs.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Phone => "number",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" | "user" => Ok(Self::Username),
            "email" | "mail" => Ok(Self::Email),
            "phone" | "number" => Ok(Self::Phone),
            "fullname" | "name" => Ok(Self::Fullname),
            other => Err(CoreError::Validation(format!("unknown query kind '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// One user query. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    kind: QueryKind,
    value: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    auxiliary: BTreeMap<String, String>,
}

impl Query {
    /// Validate and normalize user input into a query.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the value is empty after trimming,
    /// a username contains characters outside `[a-zA-Z0-9_.-]`, an email does
    /// not look like an address, a phone number has no digits, or a full-name
    /// sub-type is not recognized.
    pub fn parse(
        kind: QueryKind,
        value: &str,
        auxiliary: BTreeMap<String, String>,
    ) -> Result<Self, CoreError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CoreError::Validation(format!("{kind} query must not be empty")));
        }

        let mut auxiliary: BTreeMap<String, String> = auxiliary
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        let value = match kind {
            QueryKind::Username => {
                if !USERNAME_REGEX.is_match(value) {
                    return Err(CoreError::Validation(format!(
                        "username '{value}' may only contain letters, digits, '_', '-' and '.'"
                    )));
                }
                value.to_string()
            }
            QueryKind::Email => {
                if !EMAIL_REGEX.is_match(value) {
                    return Err(CoreError::Validation(format!(
                        "'{value}' is not an email address"
                    )));
                }
                value.to_string()
            }
            QueryKind::Phone => {
                let prefix = auxiliary
                    .get(AUX_COUNTRY_CODE)
                    .map(|p| digits_only(p))
                    .filter(|p| !p.is_empty());
                if let Some(prefix) = &prefix {
                    auxiliary.insert(AUX_COUNTRY_CODE.to_string(), prefix.clone());
                }
                normalize_phone(value, prefix.as_deref()).ok_or_else(|| {
                    CoreError::Validation(format!("phone number '{value}' contains no digits"))
                })?
            }
            QueryKind::Fullname => {
                let sub_type = auxiliary
                    .get(AUX_SUB_TYPE)
                    .map_or(DEFAULT_FULLNAME_SUB_TYPE.to_string(), |s| s.to_ascii_lowercase());
                if !FULLNAME_SUB_TYPES.contains(&sub_type.as_str()) {
                    return Err(CoreError::Validation(format!(
                        "unknown full-name search type '{sub_type}' (expected insee or facebook)"
                    )));
                }
                auxiliary.insert(AUX_SUB_TYPE.to_string(), sub_type);
                value.to_string()
            }
        };

        Ok(Self {
            kind,
            value,
            auxiliary,
        })
    }

    /// Validate a query with no auxiliary data.
    ///
    /// # Errors
    ///
    /// See [`Query::parse`].
    pub fn new(kind: QueryKind, value: &str) -> Result<Self, CoreError> {
        Self::parse(kind, value, BTreeMap::new())
    }

    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn auxiliary(&self) -> &BTreeMap<String, String> {
        &self.auxiliary
    }

    /// Look up one auxiliary value.
    #[must_use]
    pub fn aux(&self, key: &str) -> Option<&str> {
        self.auxiliary.get(key).map(String::as_str)
    }

    /// Label logged to the gateway and stored in history.
    ///
    /// Full-name searches carry their sub-type, e.g. `"Jean Dupont (insee)"`.
    #[must_use]
    pub fn history_label(&self) -> String {
        match (self.kind, self.aux(AUX_SUB_TYPE)) {
            (QueryKind::Fullname, Some(sub_type)) => format!("{} ({sub_type})", self.value),
            _ => self.value.clone(),
        }
    }
}

fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Strip every non-digit and prepend `prefix` unless already present.
fn normalize_phone(input: &str, prefix: Option<&str>) -> Option<String> {
    let digits = digits_only(input);
    if digits.is_empty() {
        return None;
    }
    match prefix {
        Some(prefix) if !digits.starts_with(prefix) => Some(format!("{prefix}{digits}")),
        _ => Some(digits),
    }
}
