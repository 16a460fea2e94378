//! In-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use futures::channel::mpsc::{UnboundedSender, unbounded};
use futures_util::StreamExt;

use crate::collab::{
    AuthError, AuthProvider, AuthResult, Direction, MessageStore, Navigator, OrderedQuery,
    SessionHub, SessionStream, SnapshotStream, StoreError, StoreResult,
};
use crate::models::{Identity, Message, NewMessage};

pub fn identity(uid: &str, display_name: Option<&str>) -> Identity {
    Identity {
        uid: uid.to_string(),
        display_name: display_name.map(str::to_string),
        email: Some(format!("{uid}@example.com")),
        photo_url: None,
    }
}

#[derive(Debug, Default)]
pub struct MemoryAuth {
    hub: SessionHub,
    next_sign_in: RefCell<Option<AuthResult<Identity>>>,
    sign_in_calls: Cell<usize>,
}

impl MemoryAuth {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn signed_out() -> Self {
        let auth = Self::default();
        auth.publish(None);
        auth
    }

    pub fn signed_in(identity: Identity) -> Self {
        let auth = Self::default();
        auth.publish(Some(identity));
        auth
    }

    pub fn publish(&self, identity: Option<Identity>) {
        self.hub.publish(identity);
    }

    pub fn close(&self) {
        self.hub.close();
    }

    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }

    pub fn queue_sign_in(&self, result: AuthResult<Identity>) {
        *self.next_sign_in.borrow_mut() = Some(result);
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.get()
    }
}

#[async_trait(?Send)]
impl AuthProvider for MemoryAuth {
    fn current_user(&self) -> Option<Identity> {
        self.hub.current()
    }

    async fn sign_in_with_provider(&self) -> AuthResult<Identity> {
        self.sign_in_calls.set(self.sign_in_calls.get() + 1);
        let result = self
            .next_sign_in
            .borrow_mut()
            .take()
            .unwrap_or(Err(AuthError::Cancelled));
        if let Ok(identity) = &result {
            self.hub.publish(Some(identity.clone()));
        }
        result
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.hub.publish(None);
        Ok(())
    }

    fn session_changes(&self) -> SessionStream {
        self.hub.subscribe()
    }
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<Message>,
    next_id: u64,
    append_calls: Vec<(String, NewMessage)>,
    fail_next: Option<StoreError>,
    subscribers: Vec<(Direction, UnboundedSender<StoreResult<Vec<Message>>>)>,
}

/// Keeps records sorted by creation time and pushes a full snapshot to every
/// subscriber after each append.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<StoreState>,
}

impl MemoryStore {
    pub fn with_messages(records: Vec<Message>) -> Self {
        let store = Self::default();
        store.state.borrow_mut().records = records;
        store
    }

    pub fn append_calls(&self) -> Vec<(String, NewMessage)> {
        self.state.borrow().append_calls.clone()
    }

    pub fn fail_next(&self, error: StoreError) {
        self.state.borrow_mut().fail_next = Some(error);
    }

    pub fn subscriber_count(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.subscribers.retain(|(_, sender)| !sender.is_closed());
        state.subscribers.len()
    }

    pub fn close(&self) {
        self.state.borrow_mut().subscribers.clear();
    }
}

fn ordered(records: &[Message], direction: Direction) -> Vec<Message> {
    match direction {
        Direction::Ascending => records.to_vec(),
        Direction::Descending => records.iter().rev().cloned().collect(),
    }
}

#[async_trait(?Send)]
impl MessageStore for MemoryStore {
    async fn append(&self, collection: &str, record: &NewMessage) -> StoreResult<String> {
        let mut state = self.state.borrow_mut();
        state
            .append_calls
            .push((collection.to_string(), record.clone()));
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }

        state.next_id += 1;
        let id = format!("m{}", state.next_id);
        state.records.push(record.clone().into_message(id.clone()));
        state.records.sort_by_key(|message| message.created_at);

        let StoreState {
            records,
            subscribers,
            ..
        } = &mut *state;
        subscribers.retain(|(direction, sender)| {
            sender
                .unbounded_send(Ok(ordered(records, *direction)))
                .is_ok()
        });
        Ok(id)
    }

    fn subscribe_ordered(&self, query: &OrderedQuery) -> SnapshotStream {
        let (sender, receiver) = unbounded();
        let mut state = self.state.borrow_mut();
        let snapshot = ordered(&state.records, query.direction);
        if sender.unbounded_send(Ok(snapshot)).is_ok() {
            state.subscribers.push((query.direction, sender));
        }
        receiver.boxed_local()
    }
}

#[derive(Debug)]
pub struct RecordingNavigator {
    location: RefCell<String>,
    redirects: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            location: RefCell::new(path.to_string()),
            redirects: RefCell::new(Vec::new()),
        }
    }

    pub fn location(&self) -> String {
        self.location.borrow().clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        *self.location.borrow_mut() = path.to_string();
        self.redirects.borrow_mut().push(path.to_string());
    }
}
