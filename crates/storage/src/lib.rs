pub mod error;
pub mod file;
pub mod ids;
pub mod memory;
pub mod message_log;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use ids::{GREETING_MESSAGE_ID, MessageId};
pub use memory::MemoryStore;
pub use message_log::MessageLog;
pub use types::{Author, DEFAULT_STORAGE_KEY, Message, now_millis};

/// String key-value surface the message log is persisted into.
///
/// Backends report failures as typed errors; [`MessageLog`] is the layer
/// that decides to swallow them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<T> KeyValueStore for Box<T>
where
    T: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
