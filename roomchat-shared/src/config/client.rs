use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use thiserror::Error;
use url::Url;

use super::Endpoints;
use crate::collab::MESSAGES_COLLECTION;

/// Errors raised while resolving the client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,

    #[error("Invalid configuration file: {message}")]
    Parse { message: String },

    #[error("Invalid {name} value: {message}")]
    InvalidEnv { name: &'static str, message: String },

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Values supplied on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub store_url: Option<Url>,
    pub auth_url: Option<Url>,
    pub provider: Option<String>,
}

/// Client configuration for the Roomchat services.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the document store
    pub store_url: Url,

    /// Base URL of the auth service
    pub auth_url: Url,

    /// Collection holding the room's messages
    pub collection: String,

    /// Identity provider used for interactive sign-in
    pub provider: String,

    /// Logging level
    pub log_level: String,
}

impl Config {
    /// Generates a default configuration.
    ///
    /// # Panics
    /// Never: the default URLs are constant and valid.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            store_url: Url::parse("http://localhost:8080/store/").expect("valid default URL"),
            auth_url: Url::parse("http://localhost:8080/auth/").expect("valid default URL"),
            collection: MESSAGES_COLLECTION.to_string(),
            provider: "google".to_string(),
            log_level: "info".to_string(),
        }
    }

    /// Loads the configuration from defaults, then an optional file, then
    /// `ROOMCHAT_*` environment variables, then command-line overrides.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, an environment
    /// variable holds an invalid value, or the result fails validation.
    pub fn load_config(
        config_path: Option<PathBuf>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };

        if let Some(value) = env_value("ROOMCHAT_STORE_URL") {
            config.store_url = parse_url("ROOMCHAT_STORE_URL", &value)?;
        }
        if let Some(value) = env_value("ROOMCHAT_AUTH_URL") {
            config.auth_url = parse_url("ROOMCHAT_AUTH_URL", &value)?;
        }
        if let Some(value) = env_value("ROOMCHAT_COLLECTION") {
            config.collection = value;
        }
        if let Some(value) = env_value("ROOMCHAT_PROVIDER") {
            config.provider = value;
        }
        if let Some(value) = env_value("ROOMCHAT_LOG_LEVEL") {
            config.log_level = value;
        }

        if let Some(url) = overrides.store_url {
            config.store_url = url;
        }
        if let Some(url) = overrides.auth_url {
            config.auth_url = url;
        }
        if let Some(provider) = overrides.provider {
            config.provider = provider;
        }

        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => serde_yml::from_str(&content).map_err(|err| {
                ConfigError::Parse {
                    message: err.to_string(),
                }
            }),
            Some("json") => serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
                message: err.to_string(),
            }),
            _ => Err(ConfigError::UnsupportedFormat),
        }
    }

    /// Service endpoints derived from the configured base URLs.
    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.store_url.as_str(), self.auth_url.as_str())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, url) in [("store_url", &self.store_url), ("auth_url", &self.auth_url)] {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(format!("{name} must use http or https, got {}", url.scheme()));
            }
        }

        if self.collection.trim().is_empty() {
            errors.push("collection must not be empty".to_string());
        } else if self.collection.contains('/') {
            errors.push("collection must not contain '/'".to_string());
        }

        if self.provider.trim().is_empty() {
            errors.push("provider must not be empty".to_string());
        }

        if !matches!(
            self.log_level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            errors.push(format!("unknown log level '{}'", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|err| ConfigError::InvalidEnv {
        name,
        message: err.to_string(),
    })
}
