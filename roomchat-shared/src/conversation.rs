//! # Conversation
//!
//! State of the single chat room as one view sees it: the last snapshot from
//! the store, the compose text, and the selected reply target. Groupings and
//! reply parents are derived on read and never stored.

use chrono::{DateTime, TimeZone};
use tracing::{debug, info};

use crate::chat::{DayGroup, find_parent, group_by_day};
use crate::collab::{MessageStore, OrderedQuery, SnapshotStream, StoreResult};
use crate::models::{Identity, Message, NewMessage, Timestamp};

/// Result of a send attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty text or no signed-in user: nothing was sent.
    Skipped,
    /// The store accepted the record under this id.
    Sent { id: String },
}

/// Open the room's live query, oldest message first.
pub fn subscribe<S: MessageStore + ?Sized>(store: &S, collection: &str) -> SnapshotStream {
    store.subscribe_ordered(&OrderedQuery::by_creation(collection))
}

/// Build the record for a send, or `None` when the send is a no-op.
#[must_use]
pub fn draft(
    text: &str,
    reply_to: Option<&Message>,
    user: Option<&Identity>,
    now: Timestamp,
) -> Option<NewMessage> {
    let user = user?;
    if text.is_empty() {
        return None;
    }
    Some(NewMessage {
        user: user.profile(),
        content: text.to_string(),
        created_at: now,
        reply_to_id: reply_to.map(|target| target.id.clone()),
    })
}

/// Append a message built from the compose state.
///
/// Views that keep compose text and reply target in separate cells call this
/// and clear both when it returns `Sent`.
///
/// # Errors
/// Store failures are returned unchanged; nothing is retried.
pub async fn submit<S: MessageStore + ?Sized>(
    store: &S,
    collection: &str,
    text: &str,
    reply_to: Option<&Message>,
    user: Option<&Identity>,
    now: Timestamp,
) -> StoreResult<SendOutcome> {
    let Some(record) = draft(text, reply_to, user, now) else {
        debug!("send skipped: empty text or no signed-in user");
        return Ok(SendOutcome::Skipped);
    };

    let id = store.append(collection, &record).await?;
    info!(
        id = %id,
        uid = %record.user.uid,
        reply = record.reply_to_id.is_some(),
        "message appended"
    );
    Ok(SendOutcome::Sent { id })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
    text: String,
    reply_to: Option<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the local list with a snapshot, verbatim and in store order.
    pub fn apply_snapshot(&mut self, messages: Vec<Message>) {
        debug!(count = messages.len(), "snapshot applied");
        self.messages = messages;
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub const fn reply_target(&self) -> Option<&Message> {
        self.reply_to.as_ref()
    }

    pub fn select_reply_target(&mut self, target: Message) {
        self.reply_to = Some(target);
    }

    pub fn clear_reply_target(&mut self) {
        self.reply_to = None;
    }

    /// Day groups as of `now`.
    pub fn groups<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<DayGroup<'_>> {
        group_by_day(&self.messages, now)
    }

    /// The loaded message `message` replies to.
    #[must_use]
    pub fn parent_of(&self, message: &Message) -> Option<&Message> {
        find_parent(&self.messages, message)
    }

    /// Send the compose text as `user`.
    ///
    /// Compose text and reply target are cleared only after the store accepts
    /// the record; the message itself appears with the next snapshot.
    ///
    /// # Errors
    /// Store failures are returned unchanged and leave the compose state as is.
    pub async fn send_message<S: MessageStore + ?Sized>(
        &mut self,
        store: &S,
        collection: &str,
        user: Option<&Identity>,
    ) -> StoreResult<SendOutcome> {
        let outcome = submit(
            store,
            collection,
            &self.text,
            self.reply_to.as_ref(),
            user,
            Timestamp::now(),
        )
        .await?;
        if matches!(outcome, SendOutcome::Sent { .. }) {
            self.text.clear();
            self.reply_to = None;
        }
        Ok(outcome)
    }
}
