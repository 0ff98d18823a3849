#![deny(unsafe_code)]

/// Chatter-Box session core.
///
/// Everything here is host-agnostic: the host supplies a [`chat::ChatView`],
/// a key-value backend and a randomness source, forwards UI events to a
/// [`chat::ChatSession`] and runs the reply timers the session asks for.
pub mod chat;
/// User-tunable settings shared by every front-end.
pub mod settings;

pub use chat::{ChatEvent, ChatSession, ChatView, ListItem, PendingReply};
pub use chatterbox_storage as storage;
pub use settings::ChatSettings;
