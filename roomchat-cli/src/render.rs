//! Plain-text rendering of the conversation for terminals.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone};
use shared::chat::display::excerpt;
use shared::chat::{DayLabel, display_name, format_time};
use shared::conversation::Conversation;
use shared::models::Message;

const QUOTE_CHARS: usize = 60;

pub fn separator(label: DayLabel) -> String {
    format!("──── {label} ────")
}

/// One message as `[HH:MM] #id Name: content`, with a quoted parent line when
/// the parent is loaded.
pub fn message_line<Tz>(message: &Message, parent: Option<&Message>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut line = String::new();
    if let Some(parent) = parent {
        line.push_str(&format!(
            "        ↳ {}: {}\n",
            display_name(&parent.user),
            excerpt(&parent.content, QUOTE_CHARS)
        ));
    }
    line.push_str(&format!(
        "[{}] #{} {}: {}",
        format_time(&message.created_at, tz),
        message.id,
        display_name(&message.user),
        message.content
    ));
    line
}

/// Prints each message once, in snapshot order, with a separator whenever the
/// day changes.
#[derive(Debug, Default)]
pub struct TranscriptPrinter {
    printed: HashSet<String>,
    last_label: Option<DayLabel>,
}

impl TranscriptPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines for loaded messages that have not been printed yet.
    pub fn render_new<Tz>(&mut self, conversation: &Conversation, now: &DateTime<Tz>) -> Vec<String>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let tz = now.timezone();
        let mut lines = Vec::new();
        for group in conversation.groups(now) {
            for message in group.messages {
                if !self.printed.insert(message.id.clone()) {
                    continue;
                }
                if self.last_label != Some(group.label) {
                    lines.push(separator(group.label));
                    self.last_label = Some(group.label);
                }
                lines.push(message_line(message, conversation.parent_of(message), &tz));
            }
        }
        lines
    }
}
