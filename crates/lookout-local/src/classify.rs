//! Classification of selected text for the context-menu trigger.

use std::sync::LazyLock;

use lookout_core::QueryKind;
use lookout_core::query::EMAIL_REGEX;
use regex::Regex;
use serde::Serialize;

/// Longest label shown in a menu entry, ellipsis included.
pub const LABEL_MAX_CHARS: usize = 30;

/// Loose phone shape, matched anywhere in the whitespace-stripped text.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{1,4}\)?[-.\s]?\d{1,4}[-.\s]?\d{1,9}")
        .expect("valid phone regex")
});

/// What a text selection looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// The selection, trimmed.
    pub text: String,
    /// The selection shortened for display.
    pub label: String,
    pub email: bool,
    pub phone: bool,
}

/// One entry of the selection menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub kind: QueryKind,
    pub title: String,
}

#[must_use]
pub fn classify(selection: &str) -> Classification {
    let text = selection.trim().to_string();
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Classification {
        label: truncate_label(&text, LABEL_MAX_CHARS),
        email: EMAIL_REGEX.is_match(&text),
        phone: PHONE_REGEX.is_match(&compact),
        text,
    }
}

impl Classification {
    /// Kinds offered for this selection. Username and email are always
    /// offered; phone only when a number was detected.
    #[must_use]
    pub fn suggested_kinds(&self) -> Vec<QueryKind> {
        let mut kinds = vec![QueryKind::Username, QueryKind::Email];
        if self.phone {
            kinds.push(QueryKind::Phone);
        }
        kinds
    }

    /// Menu entries, in display order.
    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        let label = &self.label;
        self.suggested_kinds()
            .into_iter()
            .map(|kind| {
                let title = match kind {
                    QueryKind::Email if self.email => format!("Analyze '{label}' (Email detected)"),
                    QueryKind::Email => format!("Analyze '{label}' as EMAIL"),
                    QueryKind::Phone => format!("Search '{label}' (Phone detected)"),
                    _ => format!("Search '{label}' as USERNAME"),
                };
                MenuItem { kind, title }
            })
            .collect()
    }
}

/// Shorten `text` to at most `max` characters, ending in `...` when cut.
#[must_use]
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut label: String = text.chars().take(keep).collect();
    label.push_str("...");
    label
}
