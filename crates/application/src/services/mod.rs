//! Application services - Use case implementations

mod message_processor;

pub use message_processor::MessageProcessor;
