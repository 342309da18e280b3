//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: OpenTelemetry
//! counters and trace correlation, and the Telegram messenger. Also owns
//! configuration loading and backoff policy.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, TelegramAppConfig};
pub use retry::{RetryConfig, Retryable, backoff_for, retry};
pub use telemetry::{
    CounterRegistry, LogFormat, TelemetryConfig, TelemetryGuard, TelemetryProvider,
    TelemetryStatus, init_telemetry,
};
