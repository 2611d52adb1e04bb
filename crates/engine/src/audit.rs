//! Audit sinks — where engine audit lines are forwarded.
//!
//! The engine keeps every line in memory for the process lifetime and hands
//! each one to its sinks in submission order.

use std::sync::{Mutex, PoisonError};

/// Trait for audit line sinks.
pub trait AuditSink: Send + Sync {
    fn record(&self, line: &str);
}

/// Emits each line as a `tracing` event.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, line: &str) {
        tracing::info!(target: "herald::audit", "{line}");
    }
}

/// Collects lines in memory. Useful for tests and front ends that tail the log.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for MemorySink {
    fn record(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

impl<T: AuditSink + ?Sized> AuditSink for std::sync::Arc<T> {
    fn record(&self, line: &str) {
        (**self).record(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.record("[ENGINE] a();");
        sink.record("[ENGINE] b();");
        assert_eq!(sink.lines(), vec!["[ENGINE] a();", "[ENGINE] b();"]);
    }

    #[test]
    fn shared_sink_records_through_arc() {
        let sink = Arc::new(MemorySink::new());
        let boxed: Box<dyn AuditSink> = Box::new(sink.clone());
        boxed.record("[ENGINE] Processor.idle();");
        assert_eq!(sink.lines().len(), 1);
    }
}
