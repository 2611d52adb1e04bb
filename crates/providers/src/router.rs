//! Dispatcher construction from configuration.
//!
//! Selects the backend named by `fallback.provider`. The HTTP client carries
//! the configured timeout; the engine additionally bounds each call with a
//! [`TimeoutDispatcher`](crate::TimeoutDispatcher).

use crate::gemini::GeminiDispatcher;
use herald_config::AppConfig;
use herald_core::Dispatcher;
use herald_core::error::DispatchError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Names of the built-in backends.
const BUILTIN_DISPATCHERS: &[&str] = &["gemini"];

/// Build the fallback dispatcher described by `config`.
///
/// The credential is not consulted here: it is supplied per request, so the
/// same dispatcher serves callers with and without a key.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Dispatcher>, DispatchError> {
    let fallback = &config.fallback;
    let timeout = Duration::from_secs(fallback.timeout_secs);

    let backend: Arc<dyn Dispatcher> = match fallback.provider.as_str() {
        "gemini" => Arc::new(
            GeminiDispatcher::new(&fallback.base_url, &fallback.model, &fallback.persona)
                .with_http_timeout(timeout),
        ),
        other => {
            return Err(DispatchError::NotConfigured(format!(
                "unknown fallback provider '{other}' (built in: {})",
                BUILTIN_DISPATCHERS.join(", ")
            )));
        }
    };

    debug!(
        provider = %fallback.provider,
        model = %fallback.model,
        timeout_secs = fallback.timeout_secs,
        "Built fallback dispatcher"
    );

    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_from_default_config() {
        let dispatcher = build_from_config(&AppConfig::default()).unwrap();
        assert_eq!(dispatcher.name(), "gemini");
    }

    #[test]
    fn unknown_provider_is_not_configured() {
        let mut config = AppConfig::default();
        config.fallback.provider = "openrouter".into();
        match build_from_config(&config) {
            Err(DispatchError::NotConfigured(msg)) => {
                assert!(msg.contains("openrouter"));
                assert!(msg.contains("gemini"));
            }
            Err(other) => panic!("Expected NotConfigured, got: {other:?}"),
            Ok(_) => panic!("Expected NotConfigured, got a dispatcher"),
        }
    }
}
