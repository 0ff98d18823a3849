use std::time::Duration;

use chatterbox_storage::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};

use crate::chat::simulator::DelayPolicy;

pub const DEFAULT_GREETING: &str = "Welcome to Chatter-Box! Try sending a message below.";
pub const DEFAULT_TYPING_TEXT: &str = "Typing…";
pub const DEFAULT_USER_LABEL: &str = "You";
pub const DEFAULT_BOT_LABEL: &str = "Chatter-Box";
pub const DEFAULT_BASE_DELAY_MS: u64 = 700;
pub const DEFAULT_PER_CHAR_DELAY_MS: u64 = 25;
pub const DEFAULT_MAX_EXTRA_DELAY_MS: u64 = 1_800;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Initial state of the persistence toggle.
    #[serde(default = "default_persistence_enabled")]
    pub persistence_enabled: bool,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_typing_text")]
    pub typing_text: String,
    #[serde(default = "default_user_label")]
    pub user_label: String,
    #[serde(default = "default_bot_label")]
    pub bot_label: String,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_per_char_delay_ms")]
    pub per_char_delay_ms: u64,
    #[serde(default = "default_max_extra_delay_ms")]
    pub max_extra_delay_ms: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            persistence_enabled: default_persistence_enabled(),
            greeting: default_greeting(),
            typing_text: default_typing_text(),
            user_label: default_user_label(),
            bot_label: default_bot_label(),
            base_delay_ms: default_base_delay_ms(),
            per_char_delay_ms: default_per_char_delay_ms(),
            max_extra_delay_ms: default_max_extra_delay_ms(),
        }
    }
}

impl ChatSettings {
    /// Fills blank text fields back in with defaults.
    pub fn normalized(mut self) -> Self {
        normalize_text(&mut self.storage_key, default_storage_key);
        normalize_text(&mut self.greeting, default_greeting);
        normalize_text(&mut self.typing_text, default_typing_text);
        normalize_text(&mut self.user_label, default_user_label);
        normalize_text(&mut self.bot_label, default_bot_label);
        self
    }

    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy::new(
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.per_char_delay_ms),
            Duration::from_millis(self.max_extra_delay_ms),
        )
    }
}

fn normalize_text(value: &mut String, fallback: fn() -> String) {
    if value.trim().is_empty() {
        *value = fallback();
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_persistence_enabled() -> bool {
    true
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_typing_text() -> String {
    DEFAULT_TYPING_TEXT.to_string()
}

fn default_user_label() -> String {
    DEFAULT_USER_LABEL.to_string()
}

fn default_bot_label() -> String {
    DEFAULT_BOT_LABEL.to_string()
}

fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}

fn default_per_char_delay_ms() -> u64 {
    DEFAULT_PER_CHAR_DELAY_MS
}

fn default_max_extra_delay_ms() -> u64 {
    DEFAULT_MAX_EXTRA_DELAY_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let settings: ChatSettings =
            serde_json::from_str(r#"{"persistence_enabled":false,"bot_label":"Echo"}"#).unwrap();

        assert!(!settings.persistence_enabled);
        assert_eq!(settings.bot_label, "Echo");
        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(settings.base_delay_ms, 700);
    }

    #[test]
    fn normalized_restores_blank_text_fields() {
        let settings = ChatSettings {
            storage_key: "  ".to_string(),
            greeting: String::new(),
            ..ChatSettings::default()
        }
        .normalized();

        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(settings.greeting, DEFAULT_GREETING);
    }
}
