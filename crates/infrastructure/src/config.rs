//! Client configuration.
//!
//! Settings are read from an optional file and then from `BYTES_*`
//! environment variables, later sources winning:
//!
//! | Key            | Variable             | Default  |
//! |----------------|----------------------|----------|
//! | `backend`      | `BYTES_BACKEND`      | `remote` |
//! | `api`          | `BYTES_API`          |          |
//! | `username`     | `BYTES_USERNAME`     |          |
//! | `password`     | `BYTES_PASSWORD`     |          |
//! | `timeout_secs` | `BYTES_TIMEOUT_SECS` | `30`     |

use std::path::Path;
use std::time::Duration;

use boefjes_application::StoreError;
use boefjes_domain::Credentials;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::adapters::DEFAULT_TIMEOUT;

/// Prefix of the environment variables read by [`BytesClientConfig::load`].
pub const ENV_PREFIX: &str = "BYTES";

/// Errors raised while loading configuration or building a store from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A setting required by the selected backend is absent.
    #[error("missing setting `{0}` (set BYTES_{upper})", upper = .0.to_uppercase())]
    Missing(&'static str),

    /// The configured client could not be created.
    #[error(transparent)]
    Client(#[from] StoreError),
}

/// Which artifact store to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// The Bytes API over HTTP.
    #[default]
    Remote,
    /// Process-local storage.
    Memory,
}

/// Raw client configuration as read from file and environment.
#[derive(Clone, Deserialize)]
pub struct BytesClientConfig {
    /// Store backend.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Base URL of the Bytes API.
    #[serde(default)]
    pub api: Option<Url>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Login password.
    #[serde(default)]
    pub password: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for BytesClientConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            api: None,
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for BytesClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BytesClientConfig")
            .field("backend", &self.backend)
            .field("api", &self.api.as_ref().map(Url::as_str))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl BytesClientConfig {
    /// Loads configuration from `path` (if given) and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file is missing or malformed, or
    /// a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        Self::from_builder(builder)
    }

    /// Builds configuration from already assembled sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source fails or a value has the
    /// wrong type.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config = builder.build()?.try_deserialize()?;
        tracing::debug!(?config, "loaded client configuration");
        Ok(config)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings for the remote backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first absent setting.
    pub fn remote_settings(&self) -> Result<RemoteSettings, ConfigError> {
        let base_url = self.api.clone().ok_or(ConfigError::Missing("api"))?;
        let username = self
            .username
            .clone()
            .ok_or(ConfigError::Missing("username"))?;
        let password = self
            .password
            .clone()
            .ok_or(ConfigError::Missing("password"))?;

        Ok(RemoteSettings::new(base_url, Credentials::new(username, password))
            .with_timeout(self.timeout()))
    }
}

/// Everything the remote store needs to connect.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Base URL of the Bytes API.
    pub base_url: Url,
    /// Login credentials.
    pub credentials: Credentials,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RemoteSettings {
    /// Settings with the default timeout.
    #[must_use]
    pub const fn new(base_url: Url, credentials: Credentials) -> Self {
        Self {
            base_url,
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
