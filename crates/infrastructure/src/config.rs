//! Application configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `kbot.toml` in the working directory, `KBOT_*` environment variables
//! (`__` separates nesting levels, e.g. `KBOT_TELEGRAM__POLL_TIMEOUT_SECS`),
//! and finally the plain `TELE_TOKEN` and `METRICS_HOST` variables.

use std::{collections::HashMap, fmt};

use integration_telegram::{
    DEFAULT_API_URL, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, TelegramClientConfig,
};
use serde::{Deserialize, Serialize};

use crate::{retry::RetryConfig, telemetry::TelemetryConfig};

/// Variable holding the Telegram bot token
pub const TELE_TOKEN_VAR: &str = "TELE_TOKEN";

/// Variable holding the OTLP collector address
pub const METRICS_HOST_VAR: &str = "METRICS_HOST";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Telegram Bot API settings
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// Telemetry export and logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Backoff between failed polls and for the startup token check
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Telegram Bot API settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramAppConfig {
    /// Bot token issued by BotFather
    #[serde(default)]
    pub token: String,

    /// Bot API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Long-poll timeout in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_poll_timeout() -> u64 {
    DEFAULT_POLL_TIMEOUT_SECS
}

const fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl fmt::Debug for TelegramAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramAppConfig")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl TelegramAppConfig {
    /// Whether a token is configured
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Client configuration for the Telegram integration
    pub fn client_config(&self) -> TelegramClientConfig {
        TelegramClientConfig::new(self.token.trim())
            .with_api_url(self.api_url.clone())
            .with_poll_timeout(self.poll_timeout_secs)
            .with_request_timeout(self.request_timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(std::env::vars().collect())
    }

    /// Load configuration from the given environment variables
    pub fn load_from(vars: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        let token = non_empty(&vars, TELE_TOKEN_VAR);
        let endpoint = non_empty(&vars, METRICS_HOST_VAR);

        let config = config::Config::builder()
            .set_default("telegram.api_url", DEFAULT_API_URL)?
            .set_default("telegram.poll_timeout_secs", DEFAULT_POLL_TIMEOUT_SECS)?
            // Load from file if exists
            .add_source(config::File::with_name("kbot").required(false))
            // Override with environment variables (e.g., KBOT_TELEMETRY__LOG_FORMAT)
            .add_source(
                config::Environment::with_prefix("KBOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .set_override_option("telegram.token", token)?
            .set_override_option("telemetry.endpoint", endpoint)?
            .build()?;

        config.try_deserialize()
    }
}

fn non_empty(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    vars.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
