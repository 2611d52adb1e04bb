//! Error types for the Herald domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! None of these are fatal to the engine: guard rejections and dispatch
//! failures are recovered into a `CommandResult` by the orchestrator.

use thiserror::Error;

/// The top-level error type for Herald operations outside the request path.
#[derive(Debug, Error)]
pub enum Error {
    // --- Fallback dispatch ---
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    // --- Runtime ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of the generative fallback backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Backend returned an error: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Malformed backend response: {0}")]
    Malformed(String),

    #[error("Backend returned no candidates")]
    EmptyCandidates,

    #[error("Dispatch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Dispatcher not configured: {0}")]
    NotConfigured(String),
}

/// A request asserted something about a protected subject the knowledge
/// base cannot corroborate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subject '{subject}' needs {required} corroborating fact(s), knowledge base has {found}")]
pub struct GuardRejection {
    pub subject: String,
    pub required: usize,
    pub found: usize,
}
