//! Telemetry port - Counters and trace correlation for the message pipeline
//!
//! Spans themselves are plain `tracing` spans; this port covers the parts
//! that need the telemetry backend: incrementing per-payload counters and
//! reading the trace identifier of a span for log correlation.

#[cfg(test)]
use mockall::automock;

use domain::CounterName;
use tracing::Span;

/// Capability set the pipeline needs from the telemetry backend
///
/// Implementations must never fail the caller: metric and trace problems
/// are logged and swallowed.
#[cfg_attr(test, automock)]
pub trait TelemetryPort: Send + Sync {
    /// Add one to the counter `name`
    ///
    /// When `span` is recording, it is also tagged with the service
    /// identity. The span is never created here.
    fn increment_counter(&self, span: &Span, name: &CounterName);

    /// The 32-hex-character trace id of `span`, if it is valid and recording
    fn trace_id(&self, span: &Span) -> Option<String>;
}

/// Telemetry that records nothing
///
/// Spans still open and close through `tracing`; counters are dropped and
/// no trace id is ever reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetryPort for NoopTelemetry {
    fn increment_counter(&self, _span: &Span, _name: &CounterName) {}

    fn trace_id(&self, _span: &Span) -> Option<String> {
        None
    }
}
