use chatterbox::ChatEvent;

pub const HELP_TEXT: &str = "\
Type a message and press enter to send it.
  /clear    clear the conversation
  /persist  toggle persistence
  /help     show this help
  /quit     leave";

/// One line of terminal input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(ChatEvent),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(name) = line.trim().strip_prefix('/') else {
            return Self::Event(ChatEvent::submit(line));
        };

        match name.trim().to_ascii_lowercase().as_str() {
            "clear" => Self::Event(ChatEvent::Clear),
            "persist" => Self::Event(ChatEvent::TogglePersistence),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(name.trim().to_string()),
        }
    }
}
