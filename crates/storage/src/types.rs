use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::MessageId;

/// Key the message log lives under when nothing else is configured.
pub const DEFAULT_STORAGE_KEY: &str = "chatterbox_messages_v1";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

/// One chat entry as it is rendered and persisted.
///
/// Fields are private so the author cannot change once the message exists;
/// the serialized shape is `{ id, who, text, ts }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    who: Author,
    text: String,
    ts: i64,
}

impl Message {
    pub fn new(id: MessageId, who: Author, text: impl Into<String>, ts: i64) -> Self {
        Self {
            id,
            who,
            text: text.into(),
            ts,
        }
    }

    /// Creates a user message with a fresh id, stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageId::generate(), Author::User, text, now_millis())
    }

    /// Creates a bot message with a fresh id, stamped now.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(MessageId::generate(), Author::Bot, text, now_millis())
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn who(&self) -> Author {
        self.who
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Creation time in epoch milliseconds.
    pub fn timestamp_millis(&self) -> i64 {
        self.ts
    }

    /// Copy of this message stamped with a different time.
    pub fn restamped(&self, ts: i64) -> Self {
        Self {
            ts,
            ..self.clone()
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
