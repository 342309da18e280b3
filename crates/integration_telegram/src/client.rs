//! HTTP client for the Telegram Bot API

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{
    error::TelegramError,
    types::{
        ApiResponse, GetUpdatesParams, Message, SendMessageParams, TelegramClientConfig, Update,
        User,
    },
};

/// Telegram Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    config: TelegramClientConfig,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Create a new client
    ///
    /// The HTTP timeout covers the long-poll timeout plus the request timeout.
    pub fn new(config: TelegramClientConfig) -> Result<Self, TelegramError> {
        if config.token.trim().is_empty() {
            return Err(TelegramError::config("bot token is empty"));
        }

        let timeout = Duration::from_secs(config.poll_timeout_secs + config.request_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TelegramError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Client configuration
    pub const fn config(&self) -> &TelegramClientConfig {
        &self.config
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.config.api_url.trim_end_matches('/'),
            self.config.token
        )
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.method_url(method))
            .json(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(method, status = %status, "Telegram API response");

        let envelope: ApiResponse<R> = serde_json::from_str(&body).map_err(|e| {
            TelegramError::protocol(format!("invalid {method} response (HTTP {status}): {e}"))
        })?;
        envelope.into_result()
    }

    /// Fetch the bot's own identity, validating the token
    #[instrument(level = "debug", skip(self))]
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for new updates starting at `offset`
    #[instrument(level = "debug", skip(self))]
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout_secs,
            allowed_updates: vec!["message"],
        };
        self.call("getUpdates", &params).await
    }

    /// Send a text message to a chat
    #[instrument(level = "debug", skip(self, text), fields(text_len = text.len()))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        self.call("sendMessage", &SendMessageParams { chat_id, text }).await
    }
}
