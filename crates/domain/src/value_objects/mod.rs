//! Value Objects - Immutable, identity-less domain primitives

mod counter_name;
mod payload;
mod sender;
mod service_resource;

pub use counter_name::{COUNTER_PREFIX, CounterName};
pub use payload::{BotCommand, Payload};
pub use sender::SenderContext;
pub use service_resource::{SCHEMA_URL, SERVICE_NAME_PREFIX, ServiceResource};
