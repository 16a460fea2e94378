pub mod auth;
pub mod errors;
pub mod message;
pub mod timestamp;
pub mod user;

pub use auth::{AUTH_MESSAGE_TYPE, AuthMessage};
pub use errors::ErrorResponse;
pub use message::{AppendResponse, Message, NewMessage};
pub use timestamp::Timestamp;
pub use user::{Identity, UserProfile};
