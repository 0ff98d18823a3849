/// UI events a front-end forwards to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Form submission carrying the raw input value.
    Submit(String),
    Clear,
    TogglePersistence,
}

impl ChatEvent {
    pub fn submit(input: impl Into<String>) -> Self {
        Self::Submit(input.into())
    }
}

/// Status line text for a persistence flag.
pub fn persistence_status(enabled: bool) -> &'static str {
    if enabled {
        "Persistence: on"
    } else {
        "Persistence: off"
    }
}
