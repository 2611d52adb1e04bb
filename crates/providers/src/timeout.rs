//! Timeout-bounded dispatch.
//!
//! Wraps any [`Dispatcher`] so a single fallback call can never stall a
//! conversation. On expiry the inner future is dropped, which cancels the
//! pending request, and the call resolves to [`DispatchError::Timeout`].

use async_trait::async_trait;
use herald_core::Dispatcher;
use herald_core::error::DispatchError;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Default upper bound on one fallback call.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TimeoutDispatcher {
    inner: Arc<dyn Dispatcher>,
    timeout: Duration,
}

impl TimeoutDispatcher {
    pub fn new(inner: Arc<dyn Dispatcher>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Wrap `inner` with [`DEFAULT_DISPATCH_TIMEOUT`].
    pub fn with_default(inner: Arc<dyn Dispatcher>) -> Self {
        Self::new(inner, DEFAULT_DISPATCH_TIMEOUT)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Dispatcher for TimeoutDispatcher {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn dispatch(&self, text: &str, credential: &str) -> Result<String, DispatchError> {
        match tokio::time::timeout(self.timeout, self.inner.dispatch(text, credential)).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(
                    dispatcher = %self.inner.name(),
                    timeout_ms,
                    "Dispatch timed out, cancelling"
                );
                Err(DispatchError::Timeout { timeout_ms })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A mock dispatcher that answers immediately.
    struct InstantDispatcher {
        call_count: Mutex<usize>,
    }

    #[async_trait]
    impl Dispatcher for InstantDispatcher {
        fn name(&self) -> &str {
            "instant"
        }

        async fn dispatch(&self, text: &str, _credential: &str) -> Result<String, DispatchError> {
            *self.call_count.lock().unwrap() += 1;
            Ok(format!("reply to {text}"))
        }
    }

    /// A mock dispatcher that hangs forever.
    struct HangingDispatcher;

    #[async_trait]
    impl Dispatcher for HangingDispatcher {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn dispatch(&self, _text: &str, _credential: &str) -> Result<String, DispatchError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    /// A mock dispatcher that fails immediately.
    struct FailingDispatcher;

    #[async_trait]
    impl Dispatcher for FailingDispatcher {
        fn name(&self) -> &str {
            "failing"
        }

        async fn dispatch(&self, _text: &str, _credential: &str) -> Result<String, DispatchError> {
            Err(DispatchError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn passes_through_fast_reply() {
        let inner = Arc::new(InstantDispatcher {
            call_count: Mutex::new(0),
        });
        let d = TimeoutDispatcher::with_default(inner.clone());
        assert_eq!(d.dispatch("hi", "k").await.unwrap(), "reply to hi");
        assert_eq!(*inner.call_count.lock().unwrap(), 1);
        assert_eq!(d.name(), "instant");
        assert_eq!(d.timeout(), DEFAULT_DISPATCH_TIMEOUT);
    }

    #[tokio::test]
    async fn passes_through_inner_error() {
        let d = TimeoutDispatcher::with_default(Arc::new(FailingDispatcher));
        assert!(matches!(
            d.dispatch("hi", "k").await,
            Err(DispatchError::Transport(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_call_times_out() {
        let d = TimeoutDispatcher::new(Arc::new(HangingDispatcher), Duration::from_secs(5));
        assert_eq!(
            d.dispatch("hi", "k").await,
            Err(DispatchError::Timeout { timeout_ms: 5000 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sub_second_timeout_reports_milliseconds() {
        let d = TimeoutDispatcher::new(Arc::new(HangingDispatcher), Duration::from_millis(250));
        let err = d.dispatch("hi", "k").await.unwrap_err();
        assert_eq!(err, DispatchError::Timeout { timeout_ms: 250 });
        assert_eq!(err.to_string(), "Dispatch timed out after 250ms");
    }
}
