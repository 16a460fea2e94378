use serde::{Deserialize, Serialize};

use super::Identity;
use crate::collab::{AuthError, AuthResult};

/// Tag carried by every message the provider popup posts to its opener.
pub const AUTH_MESSAGE_TYPE: &str = "roomchat.auth";

/// Message the provider popup posts back to the window that opened it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthMessage {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthMessage {
    /// Parse a posted payload. Messages from other sources on the same window
    /// yield `None`.
    #[must_use]
    pub fn parse(payload: &str) -> Option<Self> {
        serde_json::from_str::<Self>(payload)
            .ok()
            .filter(|message| message.kind == AUTH_MESSAGE_TYPE)
    }

    /// The sign-in outcome this message reports.
    ///
    /// # Errors
    /// Returns the provider's error, or a decode error if the message carries
    /// neither an identity nor an error.
    pub fn into_result(self) -> AuthResult<Identity> {
        match (self.identity, self.error) {
            (_, Some(error)) => Err(AuthError::provider(error)),
            (Some(identity), None) => Ok(identity),
            (None, None) => Err(AuthError::decode("auth message without identity")),
        }
    }
}
