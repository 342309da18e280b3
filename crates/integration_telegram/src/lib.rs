//! Telegram Bot API integration via long polling
//!
//! This crate talks to the Telegram Bot HTTP API: `getMe` to validate the
//! token, `getUpdates` as a long poll for inbound messages and
//! `sendMessage` for replies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   HTTPS long poll    ┌─────────────────┐
//! │ TelegramClient  │ ◄──────────────────► │  Telegram Bot   │
//! │  (This crate)   │   JSON (getUpdates)  │      API        │
//! └─────────────────┘                      └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use integration_telegram::{TelegramClient, TelegramClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TelegramClient::new(TelegramClientConfig::new("123:abc"))?;
//! let me = client.get_me().await?;
//! let updates = client.get_updates(None).await?;
//! for update in updates {
//!     if let Some(message) = update.into_inbound(me.username.as_deref()) {
//!         client.send_message(message.sender.chat_id, "pong").await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use types::{
    ApiResponse, Chat, DEFAULT_API_URL, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    GetUpdatesParams, Message, ResponseParameters, SendMessageParams, TelegramClientConfig,
    Update, User,
};
