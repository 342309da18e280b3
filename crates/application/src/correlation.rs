//! Span correlation for inbound messages
//!
//! Every inbound message gets a fresh root span. Handlers derive child spans
//! from the span handed to them in [`HandlerContext`](crate::HandlerContext)
//! with `tracing::info_span!(parent: cx.span(), ...)`. Spans are closed when
//! the last handle is dropped, so every exit path (including `?` returns and
//! unwinding) closes them exactly once.

use tracing::{Span, field};

/// Name of the per-message root span
pub const MESSAGE_SPAN_NAME: &str = "kbot_handle_message";

/// `messaging.system` attribute value
pub const MESSAGING_SYSTEM: &str = "telegram";

/// `messaging.operation` attribute value
pub const MESSAGING_OPERATION: &str = "process";

/// Span field carrying the service identity
pub const SERVICE_NAME_FIELD: &str = "service.name";

/// Start a new trace root for one inbound message
///
/// The span never inherits the caller's current span: each message is its
/// own trace.
pub fn message_span() -> Span {
    tracing::info_span!(
        parent: None,
        "kbot_handle_message",
        otel.kind = "consumer",
        messaging.system = MESSAGING_SYSTEM,
        messaging.operation = MESSAGING_OPERATION,
        service.name = field::Empty,
    )
}

/// Tag `span` with the service name if it is recording
///
/// Returns whether the attribute was recorded.
pub fn tag_service(span: &Span, service_name: &str) -> bool {
    if span.is_disabled() {
        return false;
    }
    span.record(SERVICE_NAME_FIELD, service_name);
    true
}
