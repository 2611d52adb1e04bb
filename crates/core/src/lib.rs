//! # Herald Core
//!
//! Domain types, traits, and error definitions for the Herald command engine.
//! This crate has **no runtime dependencies** — it defines the domain model
//! that the engine, providers and CLI build against.
//!
//! ## Design Philosophy
//!
//! The fallback backend is defined as a trait here; implementations live in
//! `herald-providers`. This enables:
//! - Swapping backends via configuration
//! - Easy testing with mock dispatchers
//! - Clean dependency graph (all crates depend inward on core)

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod knowledge;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use command::{CommandResult, Intent, ResultKind, audit_line};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Error, GuardRejection, Result};
pub use knowledge::{ChannelKind, ContactChannel, DonationLink, KnowledgeBase, KnowledgeEntry};
pub use message::{Conversation, ConversationTurn, TurnRole};
