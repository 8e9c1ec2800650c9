//! Side channel for handler failures. The router reports here instead of failing the dispatch.

use std::fmt;

use tracing::{error, warn};

use crate::error::HandlerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One failed handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    pub severity: Severity,
    pub handler_id: String,
    pub event_id: String,
    pub error: HandlerError,
}

impl HandlerFailure {
    /// Timeouts are reported as warnings, everything else as errors.
    pub fn new(handler_id: impl Into<String>, event_id: impl Into<String>, error: HandlerError) -> Self {
        let severity = match error {
            HandlerError::Timeout(_) => Severity::Warning,
            _ => Severity::Error,
        };
        Self {
            severity,
            handler_id: handler_id.into(),
            event_id: event_id.into(),
            error,
        }
    }
}

/// Observability collaborator receiving handler failures. Must not block.
pub trait FailureSink: Send + Sync {
    fn report(&self, failure: HandlerFailure);
}

/// Default sink: logs through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingFailureSink;

impl FailureSink for TracingFailureSink {
    fn report(&self, failure: HandlerFailure) {
        match failure.severity {
            Severity::Warning => warn!(
                handler = %failure.handler_id,
                event_id = %failure.event_id,
                error = %failure.error,
                "Handler failed"
            ),
            Severity::Error => error!(
                handler = %failure.handler_id,
                event_id = %failure.event_id,
                error = %failure.error,
                "Handler failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_severity_from_error() {
        let timeout = HandlerFailure::new("ping", "e1", HandlerError::Timeout(100));
        assert_eq!(timeout.severity, Severity::Warning);

        let backend = HandlerFailure::new("ping", "e1", HandlerError::Backend("down".to_string()));
        assert_eq!(backend.severity, Severity::Error);
        assert_eq!(backend.severity.to_string(), "error");
    }
}
