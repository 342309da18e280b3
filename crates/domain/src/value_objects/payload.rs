//! Message payload and bot command parsing
//!
//! A payload is the argument part of a bot command: for `/start hello`
//! the payload is `hello`. Plain text without a leading command carries an
//! empty payload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The payload of an inbound message, used as the dispatch key
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    /// Create a payload from any string, including the empty string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Extract the payload from raw message text
    ///
    /// Returns an empty payload when the text is not a bot command.
    pub fn from_text(text: &str) -> Self {
        BotCommand::parse(text).map_or_else(Self::default, |cmd| Self::new(cmd.payload))
    }

    /// Get the payload as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A parsed bot command of the form `/name[@bot] [payload]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotCommand<'a> {
    /// Command name without the leading slash
    pub name: &'a str,
    /// Bot username the command is addressed to, if any
    pub mention: Option<&'a str>,
    /// Everything after the separating whitespace, up to the first line break
    pub payload: &'a str,
}

impl<'a> BotCommand<'a> {
    /// Parse a bot command from message text
    ///
    /// Command and mention names are ASCII word characters. The command must
    /// be followed by whitespace or the end of the text, otherwise the text is
    /// not a command.
    pub fn parse(text: &'a str) -> Option<Self> {
        let rest = text.strip_prefix('/')?;
        let (name, rest) = split_word(rest);
        if name.is_empty() {
            return None;
        }

        let (mention, rest) = match rest.strip_prefix('@') {
            Some(after_at) => {
                let (mention, rest) = split_word(after_at);
                if mention.is_empty() {
                    return None;
                }
                (Some(mention), rest)
            },
            None => (None, rest),
        };

        let payload = match rest.chars().next() {
            None => "",
            Some(c) if is_separator(c) => {
                let tail = &rest[c.len_utf8()..];
                tail.split('\n').next().unwrap_or_default()
            },
            Some(_) => return None,
        };

        Some(Self {
            name,
            mention,
            payload,
        })
    }

    /// Whether this command is meant for the bot with the given username
    ///
    /// Commands without a mention are addressed to every bot in the chat.
    pub fn is_addressed_to(&self, username: &str) -> bool {
        self.mention
            .is_none_or(|mention| mention.eq_ignore_ascii_case(username))
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let len = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    s.split_at(len)
}

const fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}
