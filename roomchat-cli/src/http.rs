//! Bearer-token implementations of the auth and store collaborators.

use std::{
    cell::RefCell,
    fmt::Display,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use async_trait::async_trait;
use futures_util::{Stream, StreamExt, stream};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::ACCEPT};
use shared::collab::{
    AuthError, AuthProvider, AuthResult, MessageStore, OrderedQuery, SessionHub, SessionStream,
    SnapshotStream, StoreError, StoreResult,
};
use shared::config::client::Config;
use shared::config::{AuthorizeMode, Endpoints};
use shared::models::{AppendResponse, ErrorResponse, Identity, Message, NewMessage};
use tracing::{debug, info, warn};

use crate::sse::SseDecoder;

/// Server-sent event carrying a whole ordered snapshot.
pub const SNAPSHOT_EVENT: &str = "snapshot";

const USER_AGENT: &str = "roomchat-cli";

/// Session token shared by the auth and store clients.
pub type SharedToken = Rc<RefCell<Option<String>>>;

pub fn build_client() -> AuthResult<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(AuthError::transport)
}

fn authorized(request: RequestBuilder, token: &SharedToken) -> RequestBuilder {
    match token.borrow().as_deref() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn rejection(response: Response) -> ErrorResponse {
    let body = response.text().await.unwrap_or_default();
    ErrorResponse::from_body(&body)
}

/// Auth collaborator backed by a session token persisted on disk.
#[derive(Debug)]
pub struct TokenAuth {
    endpoints: Endpoints,
    provider: String,
    client: Client,
    token: SharedToken,
    token_path: PathBuf,
    hub: SessionHub,
}

impl TokenAuth {
    /// Build the client, picking up a token saved at `token_path`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the token file
    /// exists but cannot be read.
    pub fn new(config: &Config, token_path: PathBuf) -> AuthResult<Self> {
        let token = match fs::read_to_string(&token_path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|token| !token.is_empty()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(AuthError::transport(err)),
        };

        Ok(Self {
            endpoints: config.endpoints(),
            provider: config.provider.clone(),
            client: build_client()?,
            token: Rc::new(RefCell::new(token)),
            token_path,
            hub: SessionHub::new(),
        })
    }

    pub fn token(&self) -> SharedToken {
        Rc::clone(&self.token)
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    pub fn has_token(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Verify the saved token and publish the resulting session.
    ///
    /// # Errors
    /// Returns an error if the auth service cannot be reached. The session is
    /// published as signed out in that case.
    pub async fn restore(&self) -> AuthResult<Option<Identity>> {
        if !self.has_token() {
            self.hub.publish(None);
            return Ok(None);
        }

        let identity = self.fetch_session().await.inspect_err(|_| {
            self.hub.publish(None);
        })?;
        if identity.is_none() {
            warn!(path = %self.token_path.display(), "saved session token was rejected");
        }
        self.hub.publish(identity.clone());
        Ok(identity)
    }

    async fn fetch_session(&self) -> AuthResult<Option<Identity>> {
        let response = authorized(self.client.get(self.endpoints.session()), &self.token)
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

    fn save_token(&self, token: &str) -> AuthResult<()> {
        if let Some(parent) = self.token_path.parent() {
            fs::create_dir_all(parent).map_err(AuthError::transport)?;
        }
        fs::write(&self.token_path, token).map_err(AuthError::transport)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.token_path, fs::Permissions::from_mode(0o600))
                .map_err(AuthError::transport)?;
        }
        debug!(path = %self.token_path.display(), "session token saved");
        Ok(())
    }

    fn forget_token(&self) -> AuthResult<()> {
        self.token.borrow_mut().take();
        match fs::remove_file(&self.token_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::transport(err)),
        }
    }
}

fn prompt(message: &str) -> AuthResult<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(AuthError::transport)?;
    Ok(input.trim().to_string())
}

#[async_trait(?Send)]
impl AuthProvider for TokenAuth {
    fn current_user(&self) -> Option<Identity> {
        self.hub.current()
    }

    /// Terminal sign-in: the provider page shows a token that the viewer
    /// pastes back here.
    async fn sign_in_with_provider(&self) -> AuthResult<Identity> {
        let url = self.endpoints.authorize(&self.provider, AuthorizeMode::Token);
        println!("Open this page in a browser to sign in:\n\n  {url}\n");
        let token = prompt("Session token: ")?;
        if token.is_empty() {
            return Err(AuthError::Cancelled);
        }

        let previous = self.token.replace(Some(token.clone()));
        let identity = match self.fetch_session().await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                self.token.replace(previous);
                return Err(AuthError::provider("session token was not accepted"));
            }
            Err(err) => {
                self.token.replace(previous);
                return Err(err);
            }
        };

        self.save_token(&token)?;
        self.hub.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if self.has_token() {
            let response = authorized(self.client.post(self.endpoints.sign_out()), &self.token)
                .send()
                .await
                .map_err(AuthError::transport)?;
            let status = response.status();
            if !status.is_success() && status != StatusCode::UNAUTHORIZED {
                return Err(AuthError::provider(rejection(response).await.to_string()));
            }
        }

        self.forget_token()?;
        info!("signed out");
        self.hub.publish(None);
        Ok(())
    }

    fn session_changes(&self) -> SessionStream {
        self.hub.subscribe()
    }
}

/// Store collaborator speaking JSON for appends and SSE for live queries.
#[derive(Debug)]
pub struct HttpStore {
    endpoints: Endpoints,
    client: Client,
    token: SharedToken,
}

impl HttpStore {
    pub fn new(config: &Config, client: Client, token: SharedToken) -> Self {
        Self {
            endpoints: config.endpoints(),
            client,
            token,
        }
    }
}

#[async_trait(?Send)]
impl MessageStore for HttpStore {
    async fn append(&self, collection: &str, record: &NewMessage) -> StoreResult<String> {
        let response = authorized(
            self.client.post(self.endpoints.documents(collection)),
            &self.token,
        )
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
        let request = authorized(self.client.get(self.endpoints.snapshots(query)), &self.token)
            .header(ACCEPT, "text/event-stream");

        let opened = async move {
            let response = request.send().await.map_err(StoreError::transport)?;
            let status = response.status();
            if !status.is_success() {
                let error = rejection(response).await;
                return Err(StoreError::rejected(status.as_u16(), error.to_string()));
            }
            Ok(response.bytes_stream())
        };

        stream::once(opened)
            .flat_map(|opened| match opened {
                Ok(bytes) => snapshot_events(bytes).boxed_local(),
                Err(err) => stream::iter([Err(err)]).boxed_local(),
            })
            .boxed_local()
    }
}

/// Decode a raw event stream into snapshots, ending with `Closed` once the
/// connection does.
pub fn snapshot_events<S, B, E>(bytes: S) -> impl Stream<Item = StoreResult<Vec<Message>>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut decoder = SseDecoder::new();
    bytes
        .map(move |chunk| match chunk {
            Ok(chunk) => decoder
                .push(chunk.as_ref())
                .into_iter()
                .filter(|event| event.event == SNAPSHOT_EVENT)
                .map(|event| {
                    serde_json::from_str::<Vec<Message>>(&event.data).map_err(StoreError::decode)
                })
                .collect::<Vec<_>>(),
            Err(err) => vec![Err(StoreError::transport(err))],
        })
        .flat_map(stream::iter)
        .chain(stream::once(async { Err(StoreError::Closed) }))
}
