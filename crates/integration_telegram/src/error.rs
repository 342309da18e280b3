//! Error types for Telegram integration

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during Telegram operations
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Bot API returned `ok: false`
    #[error("Telegram API error (code {code}): {description}")]
    Api {
        /// Error code reported by the API
        code: i32,
        /// Human-readable description
        description: String,
    },

    /// The bot token was rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Too many requests; retry after the given number of seconds
    #[error("Rate limited, retry after {retry_after}s")]
    RateLimited {
        /// Seconds to wait before the next request
        retry_after: u64,
    },

    /// Response did not match the Bot API envelope
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TelegramError {
    /// Create an API error
    #[must_use]
    pub fn api(code: i32, description: impl Into<String>) -> Self {
        Self::Api {
            code,
            description: description.into(),
        }
    }

    /// Create a protocol error
    #[must_use]
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) | Self::RateLimited { .. } => true,
            Self::Api { code, .. } => *code >= 500,
            Self::Unauthorized(_) | Self::Protocol(_) | Self::Configuration(_) => false,
        }
    }

    /// Server-requested wait before retrying, if any
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(Duration::from_secs(*retry_after)),
            _ => None,
        }
    }
}
