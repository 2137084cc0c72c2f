//! Live rendering of search results on stderr.

use std::sync::atomic::{AtomicUsize, Ordering};

use lookout_core::{SearchSession, SessionId, SourceResult, SourceStatus};
use lookout_search::ResultSink;

use crate::progress::Progress;

pub struct TerminalSink {
    progress: Progress,
    delivered: AtomicUsize,
}

impl TerminalSink {
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            progress: Progress::spinner(&format!("searching {label}")),
            delivered: AtomicUsize::new(0),
        }
    }

    /// Stop the spinner after a search that never dispatched.
    pub fn abandon(&self, reason: &str) {
        self.progress.finish_err(reason);
    }
}

impl ResultSink for TerminalSink {
    fn on_result(&self, _session: SessionId, result: &SourceResult) {
        let count = self.delivered.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress.println(&result_line(result));
        self.progress
            .set_message(&format!("{count} source(s) reported"));
    }

    fn on_settled(&self, session: &SearchSession) {
        let summary = session.summary();
        self.progress.println(&format!(
            "{} found, {} not found, {} errors, {} unverified",
            summary.found, summary.not_found, summary.errors, summary.speculative
        ));
        self.progress.finish_clear();
    }
}

/// One human-readable line per result.
pub fn result_line(result: &SourceResult) -> String {
    let marker = match result.status {
        SourceStatus::Found => "+",
        SourceStatus::NotFound => "-",
        SourceStatus::Error => "!",
        SourceStatus::Speculative => "?",
    };
    let detail = match result.status {
        SourceStatus::Error => result.error_detail.clone().unwrap_or_default(),
        SourceStatus::Speculative => result
            .payload
            .as_ref()
            .and_then(|p| p.get("profile_url"))
            .and_then(|v| v.as_str())
            .map(|url| format!("unverified: {url}"))
            .unwrap_or_default(),
        _ => String::new(),
    };
    format!("{marker} {:<14} {:<11} {detail}", result.source_id, result.status.as_str())
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn lines_show_status_and_detail() {
        assert_eq!(
            result_line(&SourceResult::found("github", json!({}))),
            "+ github         found"
        );
        assert_eq!(
            result_line(&SourceResult::timeout("reddit")),
            "! reddit         error       timeout"
        );
        assert_eq!(
            result_line(&SourceResult::speculative(
                "twitter",
                json!({ "profile_url": "https://x.com/jack" })
            )),
            "? twitter        speculative unverified: https://x.com/jack"
        );
    }
}
