//! The Herald command engine.
//!
//! Each submitted command goes through one pass:
//!
//! 1. **Guard** the text against protected subjects the knowledge base
//!    cannot corroborate
//! 2. **Classify** it with the ordered keyword table
//! 3. **Respond** with the matching rule responder
//! 4. **Fall back** to the generative backend when the rule has nothing to
//!    say and a credential is present
//! 5. **Record** one audit line and the conversation turns

pub mod audit;
pub mod classifier;
pub mod engine;
pub mod guard;
pub mod responders;

pub use audit::{AuditSink, MemorySink, TracingSink};
pub use classifier::{INTENT_TABLE, IntentRule, classify};
pub use engine::{Engine, EngineBuilder};
pub use guard::{FactGuard, ProtectedSubject};
pub use responders::{APOLOGY_TEXT, CONFIGURATION_GAP_TEXT, StatsSnapshot};
