//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod messenger_port;
mod telemetry_port;

#[cfg(test)]
pub use messenger_port::MockMessengerPort;
pub use messenger_port::{MessengerPort, OutgoingTextMessage};
#[cfg(test)]
pub use telemetry_port::MockTelemetryPort;
pub use telemetry_port::{NoopTelemetry, TelemetryPort};
