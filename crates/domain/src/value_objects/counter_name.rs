//! Counter instrument naming

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Payload;

/// Prefix shared by every per-payload counter instrument
pub const COUNTER_PREFIX: &str = "kbot_";

/// Name of the monotonic counter tracking one payload
///
/// Derived deterministically as `kbot_<payload>`, so the same payload
/// always maps to the same instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterName(String);

impl CounterName {
    /// Derive the counter name for a payload
    pub fn for_payload(payload: &Payload) -> Self {
        Self(format!("{COUNTER_PREFIX}{payload}"))
    }

    /// Get the full instrument name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CounterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Payload> for CounterName {
    fn from(payload: &Payload) -> Self {
        Self::for_payload(payload)
    }
}
