//! The orchestrator — one pass per submitted command.
//!
//! ```text
//! RECEIVED → GUARD_CHECKED → CLASSIFIED → RULE_APPLIED → [FALLBACK_ATTEMPTED] → ASSEMBLED
//! ```
//!
//! Blank input and guard rejections jump straight to ASSEMBLED. Every pass
//! ends in exactly one [`CommandResult`], one audit line and one agent turn.

use crate::audit::{AuditSink, TracingSink};
use crate::classifier::classify;
use crate::guard::{FactGuard, ProtectedSubject};
use crate::responders::{self, APOLOGY_TEXT, ResponderContext, StatsSnapshot};
use herald_config::AppConfig;
use herald_core::error::DispatchError;
use herald_core::{
    CommandResult, Conversation, ConversationTurn, Dispatcher, KnowledgeBase, audit_line,
};
use herald_providers::{DEFAULT_DISPATCH_TIMEOUT, TimeoutDispatcher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Audit lines and turns, appended together under one lock.
#[derive(Debug, Default)]
struct Journal {
    audit: Vec<String>,
    conversation: Conversation,
}

/// The command interpretation and response orchestration engine.
///
/// `Engine` is `Send + Sync`; share it behind an `Arc` to serve concurrent
/// requests.
pub struct Engine {
    knowledge: Arc<KnowledgeBase>,
    guard: FactGuard,
    social_targets: Vec<String>,
    dispatcher: Option<Arc<dyn Dispatcher>>,
    sinks: Vec<Box<dyn AuditSink>>,
    journal: Mutex<Journal>,
    requests_processed: AtomicU64,
    hallucinations_blocked: AtomicU64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("knowledge_entries", &self.knowledge.len())
            .field("guard", &self.guard.policies())
            .field("dispatcher", &self.dispatcher.as_ref().map(|d| d.name()))
            .field("sink_count", &self.sinks.len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Wire an engine from configuration, with a tracing audit sink.
    ///
    /// A fallback backend that cannot be built is an error only when a
    /// credential is configured; without one the rule engine runs alone.
    pub fn from_config(config: &AppConfig) -> herald_core::Result<Self> {
        let knowledge = Arc::new(config.knowledge_base());
        let guard = FactGuard::from_config(knowledge.clone(), &config.guard);

        let mut builder = Self::builder()
            .knowledge(knowledge)
            .guard(guard)
            .social_targets(config.social.targets.clone())
            .greeting(&config.assistant.greeting)
            .dispatch_timeout(Duration::from_secs(config.fallback.timeout_secs))
            .sink(TracingSink);

        match herald_providers::build_from_config(config) {
            Ok(dispatcher) => builder = builder.dispatcher(dispatcher),
            Err(e) if !config.has_credential() => {
                warn!(error = %e, "No usable fallback backend, running rules only");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(builder.build())
    }

    /// Process one command.
    ///
    /// `credential` gates the fallback: blank or absent means rule engine only.
    pub async fn submit(&self, text: &str, credential: Option<&str>) -> CommandResult {
        let credential = credential.map(str::trim).filter(|c| !c.is_empty());
        let result = self.process(text, credential).await;
        self.requests_processed.fetch_add(1, Ordering::SeqCst);
        self.record(text, &result);
        result
    }

    /// Synchronous façade over [`submit`](Self::submit).
    ///
    /// Drives the request on a private current-thread runtime, so it must not
    /// be called from inside an async context.
    pub fn submit_blocking(
        &self,
        text: &str,
        credential: Option<&str>,
    ) -> herald_core::Result<CommandResult> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.submit(text, credential)))
    }

    async fn process(&self, text: &str, credential: Option<&str>) -> CommandResult {
        if text.trim().is_empty() {
            debug!("Blank input, idling");
            return responders::idle();
        }

        if let Err(rejection) = self.guard.evaluate(text) {
            self.hallucinations_blocked.fetch_add(1, Ordering::SeqCst);
            warn!(
                subject = %rejection.subject,
                required = rejection.required,
                found = rejection.found,
                "Guard rejected request"
            );
            return CommandResult::error(
                format!(
                    "Error: Information about '{}' does not match the knowledge base.",
                    rejection.subject
                ),
                audit_line("Guard.reject", &format!("{:?}", rejection.subject)),
            );
        }

        let intent = classify(text);
        let fallback = self.dispatcher.as_ref().zip(credential);
        let ctx = ResponderContext {
            text,
            knowledge: &self.knowledge,
            stats: self.stats(),
            social_targets: &self.social_targets,
            fallback_available: fallback.is_some(),
        };
        let result = responders::respond(intent, &ctx);
        info!(%intent, kind = ?result.kind, deferred = result.is_deferred(), "Rule applied");

        match fallback {
            Some((dispatcher, credential)) if result.is_deferred() => {
                self.fallback(&**dispatcher, text, credential).await
            }
            _ => result,
        }
    }

    async fn fallback(
        &self,
        dispatcher: &dyn Dispatcher,
        text: &str,
        credential: &str,
    ) -> CommandResult {
        debug!(dispatcher = %dispatcher.name(), "Accessing fallback backend");

        let reply = match dispatcher.dispatch(text, credential).await {
            Ok(reply) if reply.trim().is_empty() => Err(DispatchError::EmptyCandidates),
            other => other,
        };

        match reply {
            Ok(reply) => CommandResult::text(
                reply,
                audit_line("Fallback.dispatch", &format!("{:?}", dispatcher.name())),
            ),
            Err(e) => {
                warn!(dispatcher = %dispatcher.name(), error = %e, "Fallback failed");
                CommandResult::text(
                    APOLOGY_TEXT,
                    audit_line("Fallback.failed", &format!("{:?}", e.to_string())),
                )
            }
        }
    }

    fn record(&self, text: &str, result: &CommandResult) {
        let mut journal = self.journal();
        journal.audit.push(result.audit_line.clone());
        for sink in &self.sinks {
            sink.record(&result.audit_line);
        }
        if !text.trim().is_empty() {
            journal.conversation.push(ConversationTurn::user(text));
        }
        journal
            .conversation
            .push(ConversationTurn::agent(&result.text, result.kind));
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All audit lines so far, in submission order.
    pub fn audit_lines(&self) -> Vec<String> {
        self.journal().audit.clone()
    }

    /// The conversation so far, opening greeting included.
    pub fn conversation(&self) -> Conversation {
        self.journal().conversation.clone()
    }

    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests_processed: self.requests_processed.load(Ordering::SeqCst),
            hallucinations_blocked: self.hallucinations_blocked.load(Ordering::SeqCst),
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }
}

/// Builder for [`Engine`].
pub struct EngineBuilder {
    knowledge: Arc<KnowledgeBase>,
    guard: Option<FactGuard>,
    policies: Vec<ProtectedSubject>,
    social_targets: Vec<String>,
    greeting: Option<String>,
    dispatcher: Option<Arc<dyn Dispatcher>>,
    dispatch_timeout: Duration,
    sinks: Vec<Box<dyn AuditSink>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            knowledge: Arc::new(KnowledgeBase::default()),
            guard: None,
            policies: Vec::new(),
            social_targets: Vec::new(),
            greeting: None,
            dispatcher: None,
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            sinks: Vec::new(),
        }
    }
}

impl EngineBuilder {
    pub fn knowledge(mut self, knowledge: impl Into<Arc<KnowledgeBase>>) -> Self {
        self.knowledge = knowledge.into();
        self
    }

    /// Use a prebuilt guard instead of `protect` policies.
    pub fn guard(mut self, guard: FactGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a protected subject requiring `min_facts` knowledge entries.
    pub fn protect(mut self, subject: impl Into<String>, min_facts: usize) -> Self {
        self.policies.push(ProtectedSubject::new(subject, min_facts));
        self
    }

    pub fn social_targets(mut self, targets: Vec<String>) -> Self {
        self.social_targets = targets;
        self
    }

    /// Agent turn that opens the conversation.
    pub fn greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Upper bound on one fallback call.
    pub fn dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    pub fn sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn build(self) -> Engine {
        let guard = self
            .guard
            .unwrap_or_else(|| FactGuard::new(self.knowledge.clone(), self.policies));
        let dispatcher = self.dispatcher.map(|inner| {
            Arc::new(TimeoutDispatcher::new(inner, self.dispatch_timeout)) as Arc<dyn Dispatcher>
        });
        let conversation = match self.greeting {
            Some(greeting) => Conversation::with_greeting(greeting),
            None => Conversation::new(),
        };

        Engine {
            knowledge: self.knowledge,
            guard,
            social_targets: self.social_targets,
            dispatcher,
            sinks: self.sinks,
            journal: Mutex::new(Journal {
                audit: Vec::new(),
                conversation,
            }),
            requests_processed: AtomicU64::new(0),
            hallucinations_blocked: AtomicU64::new(0),
        }
    }
}
