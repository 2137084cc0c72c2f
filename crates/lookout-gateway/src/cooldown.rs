//! Cooldown extraction from free-text rejection messages.

use std::sync::LazyLock;

use regex::Regex;

static SECONDS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid seconds regex"));

/// Derive a cooldown from a rejection message.
///
/// Messages mentioning `wait` signal rate limiting. The first integer in the
/// message is taken as seconds; `default_secs` applies when there is none.
#[must_use]
pub fn parse_cooldown(message: &str, default_secs: u64) -> Option<u64> {
    if !message.to_ascii_lowercase().contains("wait") {
        return None;
    }
    let secs = SECONDS_REGEX
        .find(message)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(default_secs);
    Some(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("please wait 30s", Some(30))]
    #[case("Please wait 12 seconds before searching again", Some(12))]
    #[case("Please wait before searching again", Some(45))]
    #[case("Insufficient credits", None)]
    #[case("Invalid token", None)]
    fn extracts_cooldown(#[case] message: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_cooldown(message, 45), expected);
    }
}
