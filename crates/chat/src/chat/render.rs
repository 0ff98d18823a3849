use chatterbox_storage::{Author, Message};
use chrono::{Local, TimeZone};

use crate::chat::simulator::PlaceholderId;

/// One row of the message list, ready to hand to a [`ChatView`](crate::chat::ChatView).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: String,
    pub who: Author,
    /// Raw text, for front-ends that do not render markup.
    pub text: String,
    /// HTML-escaped text; the only form markup-based views may insert.
    pub text_html: String,
    /// `"<label> • HH:MM"`, unescaped.
    pub meta: String,
    pub typing: bool,
}

impl ListItem {
    /// CSS classes of the `<li>` element.
    pub fn class_name(&self) -> &'static str {
        match self.who {
            Author::User => "message user",
            Author::Bot => "message bot",
        }
    }

    /// Inner markup of the `<li>` element.
    pub fn inner_html(&self) -> String {
        format!(
            r#"<div class="text">{}</div><div class="meta">{}</div>"#,
            self.text_html,
            escape_html(&self.meta)
        )
    }
}

/// Formats an epoch-millisecond timestamp for the meta line.
///
/// Hosts with locale support (the browser) supply their own; [`format_time`]
/// is the fallback.
pub type TimeFormat = fn(i64) -> String;

/// Turns messages and typing placeholders into list rows.
#[derive(Debug, Clone)]
pub struct Renderer {
    user_label: String,
    bot_label: String,
    time_format: TimeFormat,
}

impl Renderer {
    pub fn new(user_label: impl Into<String>, bot_label: impl Into<String>) -> Self {
        Self {
            user_label: user_label.into(),
            bot_label: bot_label.into(),
            time_format: format_time,
        }
    }

    pub fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.set_time_format(time_format);
        self
    }

    pub fn set_time_format(&mut self, time_format: TimeFormat) {
        self.time_format = time_format;
    }

    pub fn render(&self, message: &Message) -> ListItem {
        ListItem {
            id: message.id().to_string(),
            who: message.who(),
            text: message.text().to_string(),
            text_html: escape_html(message.text()),
            meta: self.meta(message.who(), message.timestamp_millis()),
            typing: false,
        }
    }

    pub fn render_placeholder(&self, id: PlaceholderId, text: &str, ts: i64) -> ListItem {
        ListItem {
            id: id.to_string(),
            who: Author::Bot,
            text: text.to_string(),
            text_html: escape_html(text),
            meta: self.meta(Author::Bot, ts),
            typing: true,
        }
    }

    fn meta(&self, who: Author, ts: i64) -> String {
        let label = match who {
            Author::User => &self.user_label,
            Author::Bot => &self.bot_label,
        };
        format!("{label} • {}", (self.time_format)(ts))
    }
}

/// Escapes `& < > " '` so arbitrary text can be inserted as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }

    escaped
}

/// Local wall-clock `HH:MM` for an epoch-millisecond timestamp.
pub fn format_time(ts: i64) -> String {
    match Local.timestamp_millis_opt(ts).single() {
        Some(time) => time.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatterbox_storage::MessageId;

    fn renderer() -> Renderer {
        Renderer::new("You", "Chatter-Box")
    }

    #[test]
    fn escapes_all_five_special_characters() {
        assert_eq!(
            escape_html(r#"Tom & "Jerry" <3 'cheese'"#),
            "Tom &amp; &quot;Jerry&quot; &lt;3 &#39;cheese&#39;"
        );
    }

    #[test]
    fn script_tags_never_survive_rendering() {
        let message = Message::new(
            MessageId::new("m_1"),
            Author::User,
            "<script>alert('x')</script>",
            0,
        );

        let html = renderer().render(&message).inner_html();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn rows_carry_author_class_and_label() {
        let user = renderer().render(&Message::new(MessageId::new("m_1"), Author::User, "hi", 0));
        let bot = renderer().render(&Message::new(MessageId::new("m_2"), Author::Bot, "yo", 0));

        assert_eq!(user.class_name(), "message user");
        assert!(user.meta.starts_with("You • "));
        assert_eq!(bot.class_name(), "message bot");
        assert!(bot.meta.starts_with("Chatter-Box • "));
        assert!(!user.typing);
    }

    #[test]
    fn time_is_two_digit_hours_and_minutes() {
        let formatted = format_time(1_700_000_000_000);

        assert_eq!(formatted.len(), 5);
        assert_eq!(formatted.as_bytes()[2], b':');
        assert!(formatted.chars().filter(|c| *c != ':').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn injected_time_format_ends_up_in_meta() {
        let renderer = renderer().with_time_format(|_| "09:30 PM".to_string());

        let item = renderer.render(&Message::new(MessageId::new("m_1"), Author::User, "hi", 0));
        let typing = renderer.render_placeholder(PlaceholderId::new(0), "Typing…", 0);

        assert_eq!(item.meta, "You • 09:30 PM");
        assert_eq!(typing.meta, "Chatter-Box • 09:30 PM");
        assert!(item.inner_html().ends_with(r#"<div class="meta">You • 09:30 PM</div>"#));
    }

    #[test]
    fn placeholder_rows_are_marked_as_typing() {
        let item = renderer().render_placeholder(PlaceholderId::new(3), "Typing…", 0);

        assert!(item.typing);
        assert_eq!(item.id, "t_3");
        assert_eq!(item.class_name(), "message bot");
    }
}
