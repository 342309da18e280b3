//! Types for Telegram Bot API communication

use chrono::{DateTime, Utc};
use domain::{BotCommand, InboundMessage, SenderContext};
use serde::{Deserialize, Serialize};

use crate::error::TelegramError;

/// Default Bot API base URL
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default long-poll timeout in seconds
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 10;

/// Default request timeout in seconds, on top of the long-poll timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Telegram client
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramClientConfig {
    /// Bot token issued by BotFather
    pub token: String,
    /// Bot API base URL
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout_secs: u64,
    /// HTTP timeout for a single request
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for TelegramClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClientConfig")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl TelegramClientConfig {
    /// Create a new config with the given bot token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Set the API base URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the long-poll timeout
    #[must_use]
    pub const fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}

/// Bot API response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    pub ok: bool,
    /// Result payload on success
    pub result: Option<T>,
    /// Error code on failure
    #[serde(default)]
    pub error_code: Option<i32>,
    /// Error description on failure
    #[serde(default)]
    pub description: Option<String>,
    /// Extra failure details
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

impl<T> ApiResponse<T> {
    /// Convert the envelope into a result
    pub fn into_result(self) -> Result<T, TelegramError> {
        if self.ok {
            return self
                .result
                .ok_or_else(|| TelegramError::protocol("response has ok=true but no result"));
        }

        let code = self.error_code.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        match code {
            401 => Err(TelegramError::Unauthorized(description)),
            429 => Err(TelegramError::RateLimited {
                retry_after: self
                    .parameters
                    .and_then(|p| p.retry_after)
                    .unwrap_or(1),
            }),
            _ => Err(TelegramError::api(code, description)),
        }
    }
}

/// Extra details attached to a failed response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before retrying
    #[serde(default)]
    pub retry_after: Option<u64>,
    /// New chat id after a group was migrated to a supergroup
    #[serde(default)]
    pub migrate_to_chat_id: Option<i64>,
}

/// A Telegram user or bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Whether this user is a bot
    #[serde(default)]
    pub is_bot: bool,
    /// First name
    #[serde(default)]
    pub first_name: String,
    /// Username without the leading `@`
    #[serde(default)]
    pub username: Option<String>,
}

/// A chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier
    pub id: i64,
    /// private, group, supergroup or channel
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Title for groups and channels
    #[serde(default)]
    pub title: Option<String>,
    /// Username for private chats and channels
    #[serde(default)]
    pub username: Option<String>,
}

/// A message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier inside the chat
    pub message_id: i64,
    /// Unix time the message was sent
    pub date: i64,
    /// Chat the message belongs to
    pub chat: Chat,
    /// Sender, absent for channel posts
    #[serde(default)]
    pub from: Option<User>,
    /// Text of a text message
    #[serde(default)]
    pub text: Option<String>,
}

/// An incoming update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Update identifier, used as the polling offset
    pub update_id: i64,
    /// New incoming message; other update kinds are left unparsed
    #[serde(default)]
    pub message: Option<Message>,
}

impl Update {
    /// Convert a text update into a pipeline message
    ///
    /// Returns `None` for updates that carry no message (channel posts,
    /// edits), for messages without text and for commands addressed to a
    /// different bot.
    pub fn into_inbound(self, bot_username: Option<&str>) -> Option<InboundMessage> {
        let update_id = self.update_id;
        let message = self.message?;
        let text = message.text?;

        if let (Some(command), Some(username)) = (BotCommand::parse(&text), bot_username)
            && !command.is_addressed_to(username)
        {
            return None;
        }

        let mut sender = SenderContext::chat(message.chat.id);
        if let Some(user) = message.from {
            sender = sender.with_user(user.id, user.username);
        }

        let received_at = DateTime::<Utc>::from_timestamp(message.date, 0).unwrap_or_else(Utc::now);
        Some(InboundMessage::new(update_id, text, sender).with_received_at(received_at))
    }
}

/// Parameters for `getUpdates`
#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesParams {
    /// First update to return; earlier ones are acknowledged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Long-poll timeout in seconds
    pub timeout: u64,
    /// Update kinds to receive
    pub allowed_updates: Vec<&'static str>,
}

/// Parameters for `sendMessage`
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageParams<'a> {
    /// Target chat
    pub chat_id: i64,
    /// Message text
    pub text: &'a str,
}
