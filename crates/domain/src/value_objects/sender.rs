//! Sender identity of an inbound message

use serde::{Deserialize, Serialize};

/// Who sent a message and where the reply goes
///
/// Opaque to the message pipeline; it is passed through unchanged from the
/// transport to the handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderContext {
    /// Chat the message arrived in
    pub chat_id: i64,
    /// Sending user, absent for channel posts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Sending user's username, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl SenderContext {
    /// Sender context for a chat with no known user
    pub const fn chat(chat_id: i64) -> Self {
        Self {
            chat_id,
            user_id: None,
            username: None,
        }
    }

    /// Attach the sending user
    #[must_use]
    pub fn with_user(mut self, user_id: i64, username: Option<String>) -> Self {
        self.user_id = Some(user_id);
        self.username = username;
        self
    }
}
