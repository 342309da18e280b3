//! Inbound message entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CounterName, Payload, SenderContext};

/// A message received from the transport, consumed once by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Transport-assigned update identifier
    pub update_id: i64,
    /// Dispatch key, possibly empty
    pub payload: Payload,
    /// Raw message text
    pub text: String,
    /// Sender identity, passed through unchanged
    pub sender: SenderContext,
    /// When the transport received the message
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Create a message from raw text, deriving the payload from it
    pub fn new(update_id: i64, text: impl Into<String>, sender: SenderContext) -> Self {
        let text = text.into();
        Self {
            update_id,
            payload: Payload::from_text(&text),
            text,
            sender,
            received_at: Utc::now(),
        }
    }

    /// Override the derived payload
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Set the receive timestamp
    #[must_use]
    pub const fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = received_at;
        self
    }

    /// Name of the counter this message increments
    pub fn counter_name(&self) -> CounterName {
        CounterName::for_payload(&self.payload)
    }
}
