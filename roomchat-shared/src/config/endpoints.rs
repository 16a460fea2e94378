use crate::collab::OrderedQuery;

/// How the provider's authorize page hands the session back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeMode {
    /// Posts the identity to the opener window and closes.
    Popup,
    /// Displays a session token for the viewer to paste into a terminal.
    Token,
}

impl AuthorizeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popup => "popup",
            Self::Token => "token",
        }
    }
}

/// URLs of the auth and store services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    store_base: String,
    auth_base: String,
}

impl Endpoints {
    pub fn new(store_base: &str, auth_base: &str) -> Self {
        Self {
            store_base: store_base.trim_end_matches('/').to_string(),
            auth_base: auth_base.trim_end_matches('/').to_string(),
        }
    }

    /// Origin of the auth service as a browser reports it on posted messages:
    /// lowercase `scheme://host[:port]` without a default port. Relative bases
    /// have no origin.
    #[must_use]
    pub fn auth_origin(&self) -> Option<String> {
        let (scheme, rest) = self.auth_base.split_once("://")?;
        let authority = &rest[..rest.find(['/', '?', '#']).unwrap_or(rest.len())];
        if scheme.is_empty() || authority.is_empty() {
            return None;
        }

        let scheme = scheme.to_ascii_lowercase();
        let authority = authority.to_ascii_lowercase();
        let host = match (scheme.as_str(), authority.rsplit_once(':')) {
            ("http", Some((host, "80"))) | ("https", Some((host, "443"))) => host,
            _ => authority.as_str(),
        };
        Some(format!("{scheme}://{host}"))
    }

    /// Append target for `collection`.
    #[must_use]
    pub fn documents(&self, collection: &str) -> String {
        format!("{}/collections/{collection}/documents", self.store_base)
    }

    /// Event stream of whole snapshots for `query`.
    #[must_use]
    pub fn snapshots(&self, query: &OrderedQuery) -> String {
        format!(
            "{}/collections/{}/snapshots?orderBy={}&direction={}",
            self.store_base,
            query.collection,
            query.order_field,
            query.direction.as_str()
        )
    }

    #[must_use]
    pub fn session(&self) -> String {
        format!("{}/session", self.auth_base)
    }

    #[must_use]
    pub fn sign_out(&self) -> String {
        format!("{}/signout", self.auth_base)
    }

    #[must_use]
    pub fn authorize(&self, provider: &str, mode: AuthorizeMode) -> String {
        format!(
            "{}/providers/{provider}/authorize?mode={}",
            self.auth_base,
            mode.as_str()
        )
    }
}
