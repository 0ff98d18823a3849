use snafu::ResultExt;

use super::KeyValueStore;
use super::error::{DecodeLogSnafu, EncodeLogSnafu, StorageResult};
use super::types::Message;

/// The persisted conversation: one JSON array under one key.
///
/// Every operation degrades to "persistence unavailable" on failure. Read
/// errors and malformed data load as an empty log, write errors are dropped,
/// and both are reported through `tracing` only.
#[derive(Debug)]
pub struct MessageLog<S> {
    store: S,
    key: String,
    enabled: bool,
}

impl<S> MessageLog<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S, key: impl Into<String>, enabled: bool) -> Self {
        Self {
            store,
            key: key.into(),
            enabled,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning persistence off leaves whatever is already stored in place.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Reads the whole log. Empty when disabled, missing or unreadable.
    pub fn load(&self) -> Vec<Message> {
        if !self.enabled {
            return Vec::new();
        }

        match self.try_load() {
            Ok(messages) => messages,
            Err(error) => {
                tracing::warn!(key = %self.key, "failed to load messages: {error}");
                Vec::new()
            }
        }
    }

    /// Replaces the whole log. No-op when disabled.
    pub fn save(&mut self, messages: &[Message]) {
        if !self.enabled {
            return;
        }

        if let Err(error) = self.try_save(messages) {
            tracing::warn!(key = %self.key, "failed to save messages: {error}");
        }
    }

    /// Read-modify-write append of a single message.
    pub fn append(&mut self, message: &Message) {
        if !self.enabled {
            return;
        }

        let mut messages = self.load();
        messages.push(message.clone());
        self.save(&messages);
    }

    /// Drops the stored log. No-op when disabled, so a log saved before
    /// persistence was switched off survives a clear.
    pub fn clear(&mut self) {
        if !self.enabled {
            return;
        }

        if let Err(error) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, "failed to clear messages: {error}");
        }
    }

    fn try_load(&self) -> StorageResult<Vec<Message>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).context(DecodeLogSnafu {
            stage: "decode-message-log",
            key: self.key.clone(),
        })
    }

    fn try_save(&mut self, messages: &[Message]) -> StorageResult<()> {
        let serialized = serde_json::to_string(messages).context(EncodeLogSnafu {
            stage: "encode-message-log",
        })?;
        self.store.set(&self.key, &serialized)
    }
}
