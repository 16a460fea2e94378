use std::{cell::RefCell, rc::Rc};

use futures::channel::mpsc::{UnboundedSender, unbounded};
use futures_util::StreamExt;

use super::SessionStream;
use crate::models::Identity;

#[derive(Debug, Default)]
struct HubState {
    /// `None` until the first auth-state notification.
    current: Option<Option<Identity>>,
    listeners: Vec<UnboundedSender<Option<Identity>>>,
}

/// Fan-out of auth-state notifications to every open [`SessionStream`].
///
/// Auth adapters publish into the hub whenever they learn the session state;
/// subscribers receive the latest known state first, then every change.
#[derive(Debug, Default, Clone)]
pub struct SessionHub {
    state: Rc<RefCell<HubState>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published identity.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.state.borrow().current.clone().flatten()
    }

    /// Record `identity` as the session state and notify subscribers.
    pub fn publish(&self, identity: Option<Identity>) {
        let mut state = self.state.borrow_mut();
        state.current = Some(identity.clone());
        state
            .listeners
            .retain(|listener| listener.unbounded_send(identity.clone()).is_ok());
        tracing::debug!(
            signed_in = identity.is_some(),
            listeners = state.listeners.len(),
            "session state published"
        );
    }

    pub fn subscribe(&self) -> SessionStream {
        let (sender, receiver) = unbounded();
        let mut state = self.state.borrow_mut();
        if let Some(current) = state.current.clone()
            && sender.unbounded_send(current).is_err()
        {
            return receiver.boxed_local();
        }
        state.listeners.push(sender);
        receiver.boxed_local()
    }

    /// Number of subscribers whose stream is still alive.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.listeners.retain(|listener| !listener.is_closed());
        state.listeners.len()
    }

    /// End every open stream.
    pub fn close(&self) {
        self.state.borrow_mut().listeners.clear();
    }
}
