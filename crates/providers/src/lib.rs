//! Generative fallback backends for Herald.
//!
//! All backends implement the `herald_core::Dispatcher` trait.
//! `build_from_config` selects one from configuration and bounds it with a
//! timeout.

pub mod gemini;
pub mod router;
pub mod timeout;

pub use gemini::GeminiDispatcher;
pub use router::build_from_config;
pub use timeout::{DEFAULT_DISPATCH_TIMEOUT, TimeoutDispatcher};
