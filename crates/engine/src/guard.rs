//! Fact guard — blocks requests about protected subjects the knowledge base
//! cannot corroborate.
//!
//! Each policy names a subject and the minimum number of knowledge entries
//! that must exist for it. A request mentioning the subject while the
//! knowledge base falls short is rejected before any responder runs.

use herald_config::GuardConfig;
use herald_core::{GuardRejection, KnowledgeBase};
use std::sync::Arc;

/// A subject that may only be mentioned with `min_facts` corroborating entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedSubject {
    pub subject: String,
    pub min_facts: usize,
}

impl ProtectedSubject {
    pub fn new(subject: impl Into<String>, min_facts: usize) -> Self {
        Self {
            subject: subject.into(),
            min_facts,
        }
    }

    /// A blank subject is never mentioned.
    fn mentioned_in(&self, normalized_text: &str) -> bool {
        let subject = self.subject.trim().to_lowercase();
        !subject.is_empty() && normalized_text.contains(&subject)
    }
}

#[derive(Debug, Clone)]
pub struct FactGuard {
    knowledge: Arc<KnowledgeBase>,
    policies: Vec<ProtectedSubject>,
}

impl FactGuard {
    pub fn new(knowledge: Arc<KnowledgeBase>, policies: Vec<ProtectedSubject>) -> Self {
        Self {
            knowledge,
            policies,
        }
    }

    pub fn from_config(knowledge: Arc<KnowledgeBase>, config: &GuardConfig) -> Self {
        let policies = config
            .protected
            .iter()
            .map(|p| ProtectedSubject::new(&p.subject, p.min_facts))
            .collect();
        Self::new(knowledge, policies)
    }

    pub fn policies(&self) -> &[ProtectedSubject] {
        &self.policies
    }

    /// Whether `text` may proceed with respect to `protected_subject`.
    ///
    /// False only when the text mentions the subject and the knowledge base
    /// holds fewer entries than required (one, unless a policy says more).
    pub fn check(&self, text: &str, protected_subject: &str) -> bool {
        let policy = self
            .policies
            .iter()
            .find(|p| p.subject.trim().eq_ignore_ascii_case(protected_subject.trim()))
            .cloned()
            .unwrap_or_else(|| ProtectedSubject::new(protected_subject, 1));
        self.violation(&text.to_lowercase(), &policy).is_none()
    }

    /// Evaluate every policy in order; the first violation rejects.
    pub fn evaluate(&self, text: &str) -> Result<(), GuardRejection> {
        let normalized = text.to_lowercase();
        match self
            .policies
            .iter()
            .find_map(|p| self.violation(&normalized, p))
        {
            Some(rejection) => Err(rejection),
            None => Ok(()),
        }
    }

    fn violation(&self, normalized: &str, policy: &ProtectedSubject) -> Option<GuardRejection> {
        if !policy.mentioned_in(normalized) {
            return None;
        }
        let found = self.knowledge.count(&policy.subject);
        (found < policy.min_facts).then(|| GuardRejection {
            subject: policy.subject.clone(),
            required: policy.min_facts,
            found,
        })
    }
}
