//! Telegram messenger adapter
//!
//! Implements the `MessengerPort` trait using the Telegram integration crate.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{MessengerPort, OutgoingTextMessage},
};
use async_trait::async_trait;
use integration_telegram::{TelegramClient, TelegramError};
use tracing::debug;

/// Adapter that implements `MessengerPort` using `TelegramClient`
#[derive(Debug, Clone)]
pub struct TelegramMessengerAdapter {
    client: Arc<TelegramClient>,
}

impl TelegramMessengerAdapter {
    /// Create a new adapter sharing `client` with the poller
    pub const fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &TelegramClient {
        &self.client
    }
}

#[async_trait]
impl MessengerPort for TelegramMessengerAdapter {
    async fn send_text(&self, message: OutgoingTextMessage) -> Result<i64, ApplicationError> {
        let sent = self
            .client
            .send_message(message.chat_id, &message.text)
            .await
            .map_err(map_telegram_error)?;

        debug!(chat_id = message.chat_id, message_id = sent.message_id, "Sent Telegram message");
        Ok(sent.message_id)
    }
}

/// Map Telegram errors to application errors
fn map_telegram_error(err: TelegramError) -> ApplicationError {
    match err {
        TelegramError::RateLimited { .. } => ApplicationError::RateLimited,
        TelegramError::Configuration(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::ExternalService(other.to_string()),
    }
}
