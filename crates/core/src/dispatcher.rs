//! Dispatcher trait — the abstraction over generative fallback backends.
//!
//! A dispatcher knows how to send one user utterance to a completion
//! backend and return the first candidate's text.
//!
//! Implementations: Gemini `generateContent`, timeout-bounded wrapper.

use async_trait::async_trait;

use crate::error::DispatchError;

/// The core Dispatcher trait.
///
/// The orchestrator calls `dispatch()` without knowing which backend is being
/// used. Implementations perform a single external call per invocation and
/// never retry.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// A human-readable name for this backend (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send `text` to the backend, authenticated with `credential`.
    async fn dispatch(&self, text: &str, credential: &str) -> Result<String, DispatchError>;
}
