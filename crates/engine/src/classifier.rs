//! Intent classification over an ordered keyword table.
//!
//! The input is lower-cased and each row is tested in order; the first row
//! with a keyword contained in the text wins. Rows earlier in the table take
//! precedence, so "donate and call" is a donation.

use herald_core::Intent;

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub keywords: &'static [&'static str],
    pub intent: Intent,
}

impl IntentRule {
    fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k))
    }
}

/// The fixed table, in evaluation order.
pub const INTENT_TABLE: &[IntentRule] = &[
    IntentRule {
        keywords: &["donate", "money"],
        intent: Intent::Donate,
    },
    IntentRule {
        keywords: &["call", "voice"],
        intent: Intent::Call,
    },
    IntentRule {
        keywords: &["post", "social"],
        intent: Intent::SocialPost,
    },
    IntentRule {
        keywords: &["status"],
        intent: Intent::Status,
    },
];

/// Classify `text` against [`INTENT_TABLE`].
pub fn classify(text: &str) -> Intent {
    classify_with(INTENT_TABLE, text)
}

/// Classify `text` against an arbitrary table. Blank input is `Unknown`.
pub fn classify_with(table: &[IntentRule], text: &str) -> Intent {
    if text.trim().is_empty() {
        return Intent::Unknown;
    }
    let normalized = text.to_lowercase();
    table
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map_or(Intent::Unknown, |rule| rule.intent)
}
