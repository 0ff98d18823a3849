use std::fmt;
use std::time::Duration;

use chatterbox_storage::Message;
use rand::Rng;

use crate::settings::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_EXTRA_DELAY_MS, DEFAULT_PER_CHAR_DELAY_MS};

/// Reply used when the user text is blank.
pub const EMPTY_INPUT_REPLY: &str = "Say something and I'll echo!";

/// Identifier of one "typing" row. Never reaches the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderId(pub u64);

impl PlaceholderId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PlaceholderId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "t_{}", self.0)
    }
}

/// Conversation generation a reply was scheduled in.
///
/// Advanced by every clear so replies scheduled before it can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ReplyEpoch(pub u64);

impl ReplyEpoch {
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// `base + min(max_extra, per_char × chars)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    base: Duration,
    per_char: Duration,
    max_extra: Duration,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            Duration::from_millis(DEFAULT_PER_CHAR_DELAY_MS),
            Duration::from_millis(DEFAULT_MAX_EXTRA_DELAY_MS),
        )
    }
}

impl DelayPolicy {
    pub const fn new(base: Duration, per_char: Duration, max_extra: Duration) -> Self {
        Self {
            base,
            per_char,
            max_extra,
        }
    }

    /// Longest delay this policy can produce.
    pub fn ceiling(&self) -> Duration {
        self.base.saturating_add(self.max_extra)
    }

    pub fn delay_for(&self, user_text: &str) -> Duration {
        let characters = u32::try_from(user_text.chars().count()).unwrap_or(u32::MAX);
        let extra = self.per_char.saturating_mul(characters).min(self.max_extra);
        self.base.saturating_add(extra)
    }
}

/// A bot reply the host has to deliver back to the session after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    placeholder: PlaceholderId,
    delay: Duration,
    epoch: ReplyEpoch,
    user_text: String,
}

impl PendingReply {
    pub fn placeholder(&self) -> PlaceholderId {
        self.placeholder
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn epoch(&self) -> ReplyEpoch {
        self.epoch
    }
}

/// Produces the delayed synthetic replies.
#[derive(Debug)]
pub struct ReplySimulator<R> {
    rng: R,
    policy: DelayPolicy,
    next_placeholder: u64,
}

impl<R> ReplySimulator<R>
where
    R: Rng,
{
    pub fn new(rng: R, policy: DelayPolicy) -> Self {
        Self {
            rng,
            policy,
            next_placeholder: 0,
        }
    }

    /// Reserves a placeholder and computes the delay for one reply.
    pub fn schedule(&mut self, user_text: &str, epoch: ReplyEpoch) -> PendingReply {
        let placeholder = PlaceholderId::new(self.next_placeholder);
        self.next_placeholder = self.next_placeholder.wrapping_add(1);

        PendingReply {
            placeholder,
            delay: self.policy.delay_for(user_text),
            epoch,
            user_text: user_text.to_string(),
        }
    }

    /// Builds the bot message for a reply whose delay has elapsed.
    pub fn compose(&mut self, pending: &PendingReply) -> Message {
        Message::bot(generate_reply(&pending.user_text, &mut self.rng))
    }
}

/// Picks one of the echo templates uniformly at random.
pub fn generate_reply<R>(user_text: &str, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let trimmed = user_text.trim();
    if trimmed.is_empty() {
        return EMPTY_INPUT_REPLY.to_string();
    }

    match rng.gen_range(0..4) {
        0 => format!("You said: \"{trimmed}\" — got it!"),
        1 => format!("Echo: {trimmed}"),
        2 => format!("Nice! You wrote \"{trimmed}\". What else would you like to say?"),
        _ => format!("I heard: \"{trimmed}\"."),
    }
}
