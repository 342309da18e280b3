//! Telemetry infrastructure
//!
//! OpenTelemetry tracer and meter providers exporting over OTLP, the
//! `tracing` subscriber bridging spans into them, per-payload counters and
//! trace id extraction for log correlation.

mod correlation;
mod counters;
mod otel;

pub use correlation::trace_id;
pub use counters::{CounterRegistry, validate_instrument_name};
pub use otel::{
    LogFormat, METER_NAME, SignalStatus, TRACER_NAME, TelemetryConfig, TelemetryError,
    TelemetryGuard, TelemetryProvider, TelemetryStatus, init_telemetry, normalize_endpoint,
};
