use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id carried by the greeting so a fresh log always starts with the same entry.
pub const GREETING_MESSAGE_ID: &str = "m_greet";

/// Opaque message identifier, unique among the messages of one conversation.
///
/// Logs written by older widget builds use `m_<millis>_<n>` ids; those load
/// unchanged because the id is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Mints a fresh id; v7 keeps ids roughly ordered by creation time.
    pub fn generate() -> Self {
        Self(format!("m_{}", Uuid::now_v7().simple()))
    }

    pub fn greeting() -> Self {
        Self(GREETING_MESSAGE_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
