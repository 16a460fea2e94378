use serde::{Deserialize, Serialize};

use super::{Timestamp, UserProfile};

/// A stored chat message.
///
/// Messages are immutable once created. The store assigns `id` and decides
/// the order in which messages are delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Store-assigned identifier.
    pub id: String,

    /// Sender snapshot taken when the message was sent.
    pub user: UserProfile,

    /// The message text.
    pub content: String,

    /// Creation instant, the field the room is ordered by.
    pub created_at: Timestamp,

    /// Identifier of the message this one quotes.
    #[serde(default)]
    pub reply_to_id: Option<String>,
}

/// A message record before the store has assigned it an identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    /// Sender snapshot.
    pub user: UserProfile,

    /// The message text, never empty.
    pub content: String,

    /// Creation instant observed at send time.
    pub created_at: Timestamp,

    /// Identifier of the quoted message.
    pub reply_to_id: Option<String>,
}

impl NewMessage {
    /// The stored form of this record once the store has assigned `id`.
    #[must_use]
    pub fn into_message(self, id: impl Into<String>) -> Message {
        Message {
            id: id.into(),
            user: self.user,
            content: self.content,
            created_at: self.created_at,
            reply_to_id: self.reply_to_id,
        }
    }
}

/// Body returned by the store after a successful append.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppendResponse {
    /// Identifier assigned to the new record.
    pub id: String,
}
