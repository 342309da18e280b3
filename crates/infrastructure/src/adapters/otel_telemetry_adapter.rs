//! OpenTelemetry telemetry adapter
//!
//! Implements the `TelemetryPort` trait on top of the counter registry and
//! the OpenTelemetry span context of `tracing` spans.

use std::sync::Arc;

use application::{TelemetryPort, correlation};
use domain::CounterName;
use tracing::Span;

use crate::telemetry::{self, CounterRegistry};

/// Adapter that implements `TelemetryPort` using OpenTelemetry
#[derive(Debug, Clone)]
pub struct OtelTelemetryAdapter {
    counters: Arc<CounterRegistry>,
    service_name: String,
}

impl OtelTelemetryAdapter {
    /// Create a new adapter
    pub fn new(counters: Arc<CounterRegistry>, service_name: impl Into<String>) -> Self {
        Self {
            counters,
            service_name: service_name.into(),
        }
    }

    /// The underlying counter registry
    pub fn counters(&self) -> &CounterRegistry {
        &self.counters
    }
}

impl TelemetryPort for OtelTelemetryAdapter {
    fn increment_counter(&self, span: &Span, name: &CounterName) {
        correlation::tag_service(span, &self.service_name);
        self.counters.increment(name);
    }

    fn trace_id(&self, span: &Span) -> Option<String> {
        telemetry::trace_id(span)
    }
}
