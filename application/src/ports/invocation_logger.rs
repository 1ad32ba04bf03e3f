//! Port for the structured audit trail.
//!
//! Defines the [`InvocationLogger`] trait for recording coordinator events
//! (planning, every agent invocation, validation rounds, the final outcome)
//! to a machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the full audit record
//! of a session (JSONL in the infrastructure adapter).

use serde_json::Value;

/// A structured audit event.
///
/// Each event has a type string and a JSON payload with event-specific
/// fields; the adapter adds the timestamp.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event type identifier (e.g. "invocation", "validation").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for appending audit events.
///
/// `log` is synchronous and infallible so a broken log file never stalls
/// the coordinator; adapters report their own write failures via tracing.
pub trait InvocationLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when the audit log is disabled.
pub struct NoInvocationLogger;

impl InvocationLogger for NoInvocationLogger {
    fn log(&self, _event: AuditEvent) {}
}
