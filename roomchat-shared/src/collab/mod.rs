//! # Collaborators
//!
//! Contracts for the external services the chat relies on: the identity
//! provider, the real-time document store, and route navigation.
//!
//! Everything here is single-threaded. Futures and streams are not `Send`
//! so the same implementations run on the browser event loop and on a
//! current-thread Tokio runtime.

pub mod errors;
pub mod session_hub;

use async_trait::async_trait;
use futures_util::stream::LocalBoxStream;

use crate::models::{Identity, Message, NewMessage};

pub use errors::{AuthError, AuthResult, StoreError, StoreResult};
pub use session_hub::SessionHub;

/// Collection holding the room's messages.
pub const MESSAGES_COLLECTION: &str = "messages";

/// Field the room is ordered by.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Stream of auth-state notifications. Dropping it unsubscribes.
pub type SessionStream = LocalBoxStream<'static, Option<Identity>>;

/// Stream of whole, ordered snapshots of a collection. Dropping it unsubscribes.
pub type SnapshotStream = LocalBoxStream<'static, StoreResult<Vec<Message>>>;

/// Sort direction of a live query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A live query over one collection ordered by one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedQuery {
    pub collection: String,
    pub order_field: String,
    pub direction: Direction,
}

impl OrderedQuery {
    /// Oldest-first query over `collection` by creation time.
    pub fn by_creation(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            order_field: CREATED_AT_FIELD.to_string(),
            direction: Direction::Ascending,
        }
    }
}

/// Identity provider and session lifecycle.
#[async_trait(?Send)]
pub trait AuthProvider {
    /// The identity of the current session, if one is known.
    fn current_user(&self) -> Option<Identity>;

    /// Run the provider's interactive sign-in.
    ///
    /// # Errors
    /// Returns an error if the viewer cancels, the provider refuses, or the
    /// auth service cannot be reached.
    async fn sign_in_with_provider(&self) -> AuthResult<Identity>;

    /// End the current session.
    ///
    /// # Errors
    /// Returns an error if the auth service cannot be reached.
    async fn sign_out(&self) -> AuthResult<()>;

    /// Subscribe to session changes. The first item reports the current
    /// state once it is known.
    fn session_changes(&self) -> SessionStream;
}

/// Real-time document store.
#[async_trait(?Send)]
pub trait MessageStore {
    /// Append `record` to `collection`, returning the id the store assigned.
    ///
    /// # Errors
    /// Returns an error if the store rejects the record or cannot be reached.
    async fn append(&self, collection: &str, record: &NewMessage) -> StoreResult<String>;

    /// Open a live query. Every item is a complete replacement of the
    /// result set in the store's order.
    fn subscribe_ordered(&self, query: &OrderedQuery) -> SnapshotStream;
}

/// Route navigation.
pub trait Navigator {
    fn redirect(&self, path: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_creation_query() {
        let query = OrderedQuery::by_creation(MESSAGES_COLLECTION);

        assert_eq!(query.collection, "messages");
        assert_eq!(query.order_field, "createdAt");
        assert_eq!(query.direction, Direction::Ascending);
        assert_eq!(query.direction.as_str(), "asc");
    }
}
