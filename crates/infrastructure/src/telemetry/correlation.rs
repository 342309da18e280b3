//! Trace id extraction for log correlation

use opentelemetry::trace::TraceContextExt;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Trace id of `span` as 32 lowercase hex characters
///
/// `None` when the span is disabled, or when no OpenTelemetry layer is
/// installed and the span therefore has no valid span context.
pub fn trace_id(span: &Span) -> Option<String> {
    if span.is_disabled() {
        return None;
    }

    let cx = span.context();
    let otel_span = cx.span();
    let span_context = otel_span.span_context();
    span_context
        .is_valid()
        .then(|| span_context.trace_id().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_span_has_no_trace_id() {
        assert!(trace_id(&Span::none()).is_none());
    }

    #[test]
    fn span_without_otel_layer_has_no_trace_id() {
        let subscriber = tracing_subscriber::registry();
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("plain");
            assert!(trace_id(&span).is_none());
        });
    }
}
