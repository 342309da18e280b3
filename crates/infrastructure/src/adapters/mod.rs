//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod otel_telemetry_adapter;
mod telegram_adapter;

pub use otel_telemetry_adapter::OtelTelemetryAdapter;
pub use telegram_adapter::TelegramMessengerAdapter;
