//! # Collaborator Error Types
//!
//! Failures reported by the auth and store collaborators.

use thiserror::Error;

/// Result type alias for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the identity provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The viewer closed or dismissed the provider window.
    #[error("Sign-in was cancelled")]
    Cancelled,

    /// The browser refused to open the provider window.
    #[error("Sign-in popup was blocked")]
    PopupBlocked,

    /// The provider answered with an error.
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// The auth service could not be reached.
    #[error("Auth transport error: {message}")]
    Transport { message: String },

    /// The auth service answered with something that is not an identity.
    #[error("Invalid identity payload: {message}")]
    Decode { message: String },
}

impl AuthError {
    /// Create a new provider error
    pub fn provider<T: Into<String>>(message: T) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<T: ToString>(error: T) -> Self {
        Self::Transport {
            message: error.to_string(),
        }
    }

    /// Create a new decode error
    pub fn decode<T: ToString>(error: T) -> Self {
        Self::Decode {
            message: error.to_string(),
        }
    }
}

/// Errors raised by the document store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store refused the request.
    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The store could not be reached.
    #[error("Store transport error: {message}")]
    Transport { message: String },

    /// The store answered with an unexpected payload.
    #[error("Invalid store payload: {message}")]
    Decode { message: String },

    /// The live subscription ended.
    #[error("Subscription closed")]
    Closed,
}

impl StoreError {
    /// Create a new rejection error
    pub fn rejected<T: Into<String>>(status: u16, message: T) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<T: ToString>(error: T) -> Self {
        Self::Transport {
            message: error.to_string(),
        }
    }

    /// Create a new decode error
    pub fn decode<T: ToString>(error: T) -> Self {
        Self::Decode {
            message: error.to_string(),
        }
    }
}
