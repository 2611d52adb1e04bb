//! Intents and command results — the values that flow through one request.

use serde::{Deserialize, Serialize};

/// The classified purpose of a user utterance. Derived per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Donate,
    Call,
    SocialPost,
    Status,
    Unknown,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Intent::Donate => "donate",
            Intent::Call => "call",
            Intent::SocialPost => "social_post",
            Intent::Status => "status",
            Intent::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// How the front end should present a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    #[default]
    Text,
    Error,
    /// Plain text, plus the donation link list rendered by the front end.
    PaymentPrompt,
}

/// The single response produced for one processed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub text: String,
    pub kind: ResultKind,
    pub audit_line: String,
}

impl CommandResult {
    pub fn text(text: impl Into<String>, audit_line: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ResultKind::Text,
            audit_line: audit_line.into(),
        }
    }

    pub fn error(text: impl Into<String>, audit_line: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ResultKind::Error,
            audit_line: audit_line.into(),
        }
    }

    pub fn payment_prompt(text: impl Into<String>, audit_line: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ResultKind::PaymentPrompt,
            audit_line: audit_line.into(),
        }
    }

    /// A result with no text; the orchestrator fills it in from the fallback.
    pub fn deferred() -> Self {
        Self {
            text: String::new(),
            kind: ResultKind::Text,
            audit_line: String::new(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.text.is_empty()
    }
}

/// Format an audit line in the `[ENGINE] <action>(<args>);` shape.
pub fn audit_line(action: &str, args: &str) -> String {
    format!("[ENGINE] {action}({args});")
}
