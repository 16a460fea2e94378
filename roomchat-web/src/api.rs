//! Browser implementations of the auth and store collaborators.

use std::{
    cell::RefCell,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::channel::{
    mpsc::{UnboundedReceiver, unbounded},
    oneshot,
};
use futures_util::{Stream, StreamExt, stream};
use gloo_timers::callback::Interval;
use reqwest::{Client, Response, StatusCode};
use shared::collab::{
    AuthError, AuthProvider, AuthResult, MessageStore, OrderedQuery, SessionHub, SessionStream,
    SnapshotStream, StoreError, StoreResult,
};
use shared::config::{AuthorizeMode, Endpoints};
use shared::models::{AppendResponse, AuthMessage, ErrorResponse, Identity, Message, NewMessage};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{EventSource, MessageEvent, Window};

use crate::config::FrontendConfig;

const POPUP_TARGET: &str = "roomchat-auth";
const POPUP_FEATURES: &str = "width=480,height=640";
const POPUP_POLL_MS: u32 = 500;

/// Server-sent event carrying a whole ordered snapshot.
pub const SNAPSHOT_EVENT: &str = "snapshot";

/// `EventSource.readyState` once the browser has given up reconnecting.
const EVENT_SOURCE_CLOSED: u16 = 2;

type MessageListener = Closure<dyn FnMut(MessageEvent)>;

pub(crate) fn log_error(context: &str, err: &dyn std::fmt::Display) {
    web_sys::console::error_1(&format!("{context}: {err}").into());
}

/// Text payload of a posted or streamed message event.
fn event_text(event: &MessageEvent) -> Option<String> {
    let data = event.data();
    data.as_string()
        .or_else(|| js_sys::JSON::stringify(&data).ok().map(String::from))
}

/// Sign-in outcome carried by `event`, if it was posted by `popup` from the
/// auth service origin.
pub(crate) fn popup_outcome(
    event: &MessageEvent,
    auth_origin: &str,
    popup: &JsValue,
) -> Option<AuthResult<Identity>> {
    if event.origin() != auth_origin {
        return None;
    }
    if !event
        .source()
        .is_some_and(|source| js_sys::Object::is(&source, popup))
    {
        return None;
    }
    event_text(event)
        .as_deref()
        .and_then(AuthMessage::parse)
        .map(AuthMessage::into_result)
}

async fn rejection(response: Response) -> ErrorResponse {
    let body = response.text().await.unwrap_or_default();
    ErrorResponse::from_body(&body)
}

/// Session cookie auth with a provider popup for interactive sign-in.
#[derive(Debug, Clone)]
pub struct HttpAuth {
    endpoints: Endpoints,
    provider: String,
    client: Client,
    hub: SessionHub,
}

impl HttpAuth {
    pub fn new(config: &FrontendConfig) -> Self {
        Self {
            endpoints: config.endpoints(),
            provider: config.provider.clone(),
            client: Client::new(),
            hub: SessionHub::new(),
        }
    }

    /// Look up the session the browser already holds and publish it.
    ///
    /// An unreachable auth service is reported as signed out so the gate
    /// never stays pending.
    pub async fn restore(&self) {
        match self.fetch_session().await {
            Ok(identity) => self.hub.publish(identity),
            Err(err) => {
                log_error("Session lookup failed", &err);
                self.hub.publish(None);
            }
        }
    }

    async fn fetch_session(&self) -> AuthResult<Option<Identity>> {
        let response = self
            .client
            .get(self.endpoints.session())
            .send()
            .await
            .map_err(AuthError::transport)?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::UNAUTHORIZED => Ok(None),
            status if status.is_success() => response
                .json::<Identity>()
                .await
                .map(Some)
                .map_err(AuthError::decode),
            _ => Err(AuthError::provider(rejection(response).await.to_string())),
        }
    }
}

#[async_trait(?Send)]
impl AuthProvider for HttpAuth {
    fn current_user(&self) -> Option<Identity> {
        self.hub.current()
    }

    async fn sign_in_with_provider(&self) -> AuthResult<Identity> {
        let window = web_sys::window().ok_or_else(|| AuthError::transport("no window"))?;
        let origin = self
            .endpoints
            .auth_origin()
            .ok_or_else(|| AuthError::transport("auth service URL has no origin"))?;
        let url = self.endpoints.authorize(&self.provider, AuthorizeMode::Popup);
        let popup = window
            .open_with_url_and_target_and_features(&url, POPUP_TARGET, POPUP_FEATURES)
            .ok()
            .flatten()
            .ok_or(AuthError::PopupBlocked)?;

        let identity = wait_for_popup(&window, popup, origin).await?;
        self.hub.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let response = self
            .client
            .post(self.endpoints.sign_out())
            .send()
            .await
            .map_err(AuthError::transport)?;

        if !response.status().is_success() {
            return Err(AuthError::provider(rejection(response).await.to_string()));
        }
        self.hub.publish(None);
        Ok(())
    }

    fn session_changes(&self) -> SessionStream {
        self.hub.subscribe()
    }
}

/// Resolve once the popup posts its result or the viewer closes it. Posts
/// from any other window or origin are ignored.
async fn wait_for_popup(window: &Window, popup: Window, origin: String) -> AuthResult<Identity> {
    let (sender, receiver) = oneshot::channel::<AuthResult<Identity>>();
    let sender = Rc::new(RefCell::new(Some(sender)));

    let listener = {
        let sender = Rc::clone(&sender);
        let popup: JsValue = popup.clone().into();
        MessageListener::wrap(Box::new(move |event: MessageEvent| {
            let Some(outcome) = popup_outcome(&event, &origin, &popup) else {
                return;
            };
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(outcome);
            }
        }))
    };
    window
        .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
        .map_err(|err| AuthError::transport(format!("{err:?}")))?;

    let watcher = {
        let sender = Rc::clone(&sender);
        let popup = popup.clone();
        Interval::new(POPUP_POLL_MS, move || {
            if popup.closed().unwrap_or(true)
                && let Some(sender) = sender.borrow_mut().take()
            {
                let _ = sender.send(Err(AuthError::Cancelled));
            }
        })
    };

    let result = receiver.await.unwrap_or(Err(AuthError::Cancelled));

    drop(watcher);
    let _ = window.remove_event_listener_with_callback("message", listener.as_ref().unchecked_ref());
    let _ = popup.close();
    result
}

/// JSON appends plus an `EventSource` per live query.
#[derive(Debug, Clone)]
pub struct HttpStore {
    endpoints: Endpoints,
    client: Client,
}

impl HttpStore {
    pub fn new(config: &FrontendConfig) -> Self {
        Self {
            endpoints: config.endpoints(),
            client: Client::new(),
        }
    }
}

#[async_trait(?Send)]
impl MessageStore for HttpStore {
    async fn append(&self, collection: &str, record: &NewMessage) -> StoreResult<String> {
        let response = self
            .client
            .post(self.endpoints.documents(collection))
            .json(record)
            .send()
            .await
            .map_err(StoreError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let error = rejection(response).await;
            return Err(StoreError::rejected(status.as_u16(), error.to_string()));
        }

        let created: AppendResponse = response.json().await.map_err(StoreError::decode)?;
        Ok(created.id)
    }

    fn subscribe_ordered(&self, query: &OrderedQuery) -> SnapshotStream {
        match SnapshotEvents::open(&self.endpoints.snapshots(query)) {
            Ok(events) => events.boxed_local(),
            Err(err) => stream::once(async move { Err(err) }).boxed_local(),
        }
    }
}

/// Snapshot stream backed by an `EventSource`. Dropping it closes the source.
struct SnapshotEvents {
    receiver: UnboundedReceiver<StoreResult<Vec<Message>>>,
    source: EventSource,
    _listeners: Vec<MessageListener>,
}

impl SnapshotEvents {
    fn open(url: &str) -> StoreResult<Self> {
        let source =
            EventSource::new(url).map_err(|err| StoreError::transport(format!("{err:?}")))?;
        let (sender, receiver) = unbounded();

        let on_snapshot = {
            let sender = sender.clone();
            MessageListener::wrap(Box::new(move |event: MessageEvent| {
                let Some(data) = event_text(&event) else {
                    return;
                };
                let snapshot =
                    serde_json::from_str::<Vec<Message>>(&data).map_err(StoreError::decode);
                let _ = sender.unbounded_send(snapshot);
            }))
        };

        let on_error = {
            let source = source.clone();
            MessageListener::wrap(Box::new(move |_event: MessageEvent| {
                if source.ready_state() == EVENT_SOURCE_CLOSED {
                    let _ = sender.unbounded_send(Err(StoreError::Closed));
                    sender.close_channel();
                }
            }))
        };

        for (event, listener) in [(SNAPSHOT_EVENT, &on_snapshot), ("error", &on_error)] {
            source
                .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                .map_err(|err: JsValue| StoreError::transport(format!("{err:?}")))?;
        }

        Ok(Self {
            receiver,
            source,
            _listeners: vec![on_snapshot, on_error],
        })
    }
}

impl Stream for SnapshotEvents {
    type Item = StoreResult<Vec<Message>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_next_unpin(cx)
    }
}

impl Drop for SnapshotEvents {
    fn drop(&mut self) {
        self.source.close();
    }
}
