//! Knowledge base — the immutable fact store.
//!
//! Populated once at startup from configuration. There is no mutation API:
//! the guard and the rule responders only ever read from it, so it can be
//! shared behind an `Arc` without a lock.

use serde::{Deserialize, Serialize};

/// A single corroborated fact about a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub subject: String,
    pub statement: String,
}

impl KnowledgeEntry {
    pub fn new(subject: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            statement: statement.into(),
        }
    }
}

/// The kind of a contact channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Voice,
}

/// A reachable contact point, e.g. a phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactChannel {
    pub kind: ChannelKind,
    pub address: String,
}

impl ContactChannel {
    pub fn voice(address: impl Into<String>) -> Self {
        Self {
            kind: ChannelKind::Voice,
            address: address.into(),
        }
    }
}

/// A labelled payment link shown to the user after a payment prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationLink {
    pub label: String,
    pub url: String,
}

/// Read-only store of facts plus contact and donation reference data.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    contacts: Vec<ContactChannel>,
    donation_links: Vec<DonationLink>,
}

impl KnowledgeBase {
    pub fn new(
        entries: Vec<KnowledgeEntry>,
        contacts: Vec<ContactChannel>,
        donation_links: Vec<DonationLink>,
    ) -> Self {
        Self {
            entries,
            contacts,
            donation_links,
        }
    }

    /// A knowledge base holding only facts.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self::new(entries, Vec::new(), Vec::new())
    }

    /// All entries for `subject` (trimmed, case-insensitive).
    ///
    /// The iterator is lazy; call `lookup` again to restart it.
    pub fn lookup<'a>(&'a self, subject: &str) -> impl Iterator<Item = &'a KnowledgeEntry> + 'a {
        let wanted = normalize_subject(subject);
        self.entries
            .iter()
            .filter(move |e| normalize_subject(&e.subject) == wanted)
    }

    /// Number of entries for `subject`.
    pub fn count(&self, subject: &str) -> usize {
        self.lookup(subject).count()
    }

    /// Distinct subjects, in first-seen order.
    pub fn subjects(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen
                .iter()
                .any(|s| normalize_subject(s) == normalize_subject(&entry.subject))
            {
                seen.push(&entry.subject);
            }
        }
        seen
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contacts(&self) -> &[ContactChannel] {
        &self.contacts
    }

    /// The first configured voice channel, if any.
    pub fn voice_contact(&self) -> Option<&ContactChannel> {
        self.contacts.iter().find(|c| c.kind == ChannelKind::Voice)
    }

    pub fn donation_links(&self) -> &[DonationLink] {
        &self.donation_links
    }
}

fn normalize_subject(subject: &str) -> String {
    subject.trim().to_lowercase()
}
