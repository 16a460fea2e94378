//! # Configuration
//!
//! Service locations shared by every client, plus the file/environment
//! configuration loader used by native clients.

#[cfg(not(target_arch = "wasm32"))]
pub mod client;
pub mod endpoints;

pub use endpoints::{AuthorizeMode, Endpoints};
