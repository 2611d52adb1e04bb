//! Rule responders — one pure function per intent.
//!
//! Responders read the knowledge base and a counter snapshot and return a
//! [`CommandResult`]. They never touch the network or engine state.

use herald_core::{CommandResult, Intent, KnowledgeBase, audit_line};

/// Shown when no credential is available for a richer reply.
pub const CONFIGURATION_GAP_TEXT: &str = "Command received. Executing via rule engine (simulation mode). \
For full AI chat, please add an API key in settings.";

/// Substituted for the fallback reply when dispatch fails.
pub const APOLOGY_TEXT: &str = "Connection Error. Reverting to rule engine.";

/// Counters owned by the engine, as seen by the STATUS responder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub requests_processed: u64,
    pub hallucinations_blocked: u64,
}

/// Everything a responder may read for one request.
#[derive(Debug, Clone, Copy)]
pub struct ResponderContext<'a> {
    pub text: &'a str,
    pub knowledge: &'a KnowledgeBase,
    pub stats: StatsSnapshot,
    pub social_targets: &'a [String],
    /// A credential and a dispatcher are both available.
    pub fallback_available: bool,
}

/// Apply the responder for `intent`.
pub fn respond(intent: Intent, ctx: &ResponderContext<'_>) -> CommandResult {
    match intent {
        Intent::Donate => donate(),
        Intent::Call => call(ctx.knowledge),
        Intent::SocialPost => social_post(ctx.social_targets),
        Intent::Status => status(ctx.stats, ctx.knowledge),
        Intent::Unknown => unknown(ctx.text, ctx.fallback_available),
    }
}

fn donate() -> CommandResult {
    CommandResult::payment_prompt(
        "Opening global payment gateways.",
        audit_line("Payments.openPortal", "GLOBAL"),
    )
}

fn call(knowledge: &KnowledgeBase) -> CommandResult {
    match knowledge.voice_contact() {
        Some(contact) => CommandResult::text(
            format!("Routing voice channel to {}... Connected.", contact.address),
            audit_line("Voice.dial", &format!("{:?}", contact.address)),
        ),
        None => CommandResult::error(
            "No voice channel is configured.",
            audit_line("Voice.unavailable", ""),
        ),
    }
}

fn social_post(targets: &[String]) -> CommandResult {
    if targets.is_empty() {
        return CommandResult::error(
            "No social broadcast targets are configured.",
            audit_line("SocialBot.unavailable", ""),
        );
    }
    CommandResult::text(
        format!("Scheduling social media blast to {}.", join_targets(targets)),
        audit_line("SocialBot.deploy", &targets.join(", ")),
    )
}

/// "A", "A and B", "A, B, and C".
fn join_targets(targets: &[String]) -> String {
    match targets {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

fn status(stats: StatsSnapshot, knowledge: &KnowledgeBase) -> CommandResult {
    let text = format!(
        "SYSTEM REPORT:\n- Rule Engine: Active\n- Requests Processed: {}\n- Hallucinations Blocked: {}\n- Knowledge Entries: {}",
        stats.requests_processed,
        stats.hallucinations_blocked,
        knowledge.len()
    );
    CommandResult::text(
        text,
        audit_line(
            "Status.report",
            &format!(
                "processed={}, blocked={}",
                stats.requests_processed, stats.hallucinations_blocked
            ),
        ),
    )
}

fn unknown(text: &str, fallback_available: bool) -> CommandResult {
    if fallback_available {
        return CommandResult::deferred();
    }
    CommandResult::text(
        CONFIGURATION_GAP_TEXT,
        audit_line("Processor.execute", &format!("{text:?}")),
    )
}

/// Terminal response for blank input.
pub fn idle() -> CommandResult {
    CommandResult::text(CONFIGURATION_GAP_TEXT, audit_line("Processor.idle", ""))
}
