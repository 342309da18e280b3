//! Application layer - Message pipeline and orchestration
//!
//! Contains the per-message processing pipeline, the payload handler table,
//! span correlation helpers and the port definitions implemented by the
//! infrastructure and transport crates.

pub mod correlation;
pub mod error;
pub mod handlers;
pub mod ports;
pub mod services;
#[cfg(test)]
pub(crate) mod testing;

pub use error::ApplicationError;
pub use handlers::{HandlerContext, HandlerTable, HelloHandler, MessageHandler};
pub use ports::*;
pub use services::*;
