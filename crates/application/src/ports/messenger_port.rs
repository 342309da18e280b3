//! Messenger port - Outbound side of the chat transport
//!
//! Handlers reply through this port; the Telegram adapter in the
//! infrastructure layer implements it.

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use domain::InboundMessage;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// An outgoing text message to a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingTextMessage {
    /// Target chat
    pub chat_id: i64,
    /// Text content
    pub text: String,
}

impl OutgoingTextMessage {
    /// Create a new outgoing text message
    #[must_use]
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }

    /// Create a message back to the chat an inbound message came from
    #[must_use]
    pub fn reply(incoming: &InboundMessage, text: impl Into<String>) -> Self {
        Self::new(incoming.sender.chat_id, text)
    }
}

/// Port for sending messages back to the chat platform
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Send a text message
    ///
    /// Returns the platform's message ID for the sent message.
    async fn send_text(&self, message: OutgoingTextMessage) -> Result<i64, ApplicationError>;
}
