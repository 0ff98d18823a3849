/// Event contracts between front-ends and the session.
pub mod events;
/// Escaping and list-row rendering.
pub mod render;
pub mod session;
/// Delayed echo replies.
pub mod simulator;
pub mod transcript;
pub mod view;

pub use events::{ChatEvent, persistence_status};
pub use render::{ListItem, Renderer, TimeFormat, escape_html, format_time};
pub use session::ChatSession;
pub use simulator::{
    DelayPolicy, EMPTY_INPUT_REPLY, PendingReply, PlaceholderId, ReplyEpoch, ReplySimulator,
    generate_reply,
};
pub use transcript::Transcript;
pub use view::ChatView;
