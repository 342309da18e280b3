//! Entities - Domain objects with identity

mod inbound_message;

pub use inbound_message::InboundMessage;
