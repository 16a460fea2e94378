//! Frontend configuration module
//!
//! Service locations are fixed at build time through `ROOMCHAT_*` variables.

use shared::collab::MESSAGES_COLLECTION;
use shared::config::Endpoints;

/// Frontend configuration for service URLs and the room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Base URL of the document store, absolute or relative to the page origin
    pub store_url: String,
    /// Base URL of the auth service, absolute or relative to the page origin
    pub auth_url: String,
    /// Collection holding the room's messages
    pub collection: String,
    /// Identity provider behind the sign-in button
    pub provider: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            store_url: option_env!("ROOMCHAT_STORE_URL")
                .unwrap_or("/store")
                .to_string(),
            auth_url: option_env!("ROOMCHAT_AUTH_URL")
                .unwrap_or("/auth")
                .to_string(),
            collection: option_env!("ROOMCHAT_COLLECTION")
                .unwrap_or(MESSAGES_COLLECTION)
                .to_string(),
            provider: option_env!("ROOMCHAT_PROVIDER")
                .unwrap_or("google")
                .to_string(),
        }
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoints resolved against `origin` when the configured bases are relative.
    pub fn endpoints_for(&self, origin: &str) -> Endpoints {
        Endpoints::new(
            &absolute(origin, &self.store_url),
            &absolute(origin, &self.auth_url),
        )
    }

    /// Endpoints resolved against the current page origin.
    pub fn endpoints(&self) -> Endpoints {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default();
        self.endpoints_for(&origin)
    }
}

fn absolute(origin: &str, base: &str) -> String {
    if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            base.trim_start_matches('/')
        )
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_frontend_config_default() {
        let config = FrontendConfig::default();
        assert!(!config.collection.is_empty());
        assert!(!config.provider.is_empty());
    }

    #[wasm_bindgen_test]
    fn test_relative_bases_use_origin() {
        let config = FrontendConfig {
            store_url: "/store".to_string(),
            auth_url: "https://id.example.com/auth/".to_string(),
            collection: "messages".to_string(),
            provider: "google".to_string(),
        };

        let endpoints = config.endpoints_for("https://chat.example.com/");

        assert_eq!(
            endpoints.documents("messages"),
            "https://chat.example.com/store/collections/messages/documents"
        );
        assert_eq!(endpoints.session(), "https://id.example.com/auth/session");
    }

    #[wasm_bindgen_test]
    fn test_endpoints_from_page_origin() {
        let endpoints = FrontendConfig::new().endpoints();
        assert!(endpoints.session().starts_with("http"));
    }
}
