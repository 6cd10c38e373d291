//! Client configuration
//!
//! A [`ClientConfig`] can be built in code, read from the environment or loaded from a JSON file.

use crate::error::{OdooError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the server URL
pub const ENV_URL: &str = "ODOO_URL";
/// Environment variable overriding the port from the URL
pub const ENV_PORT: &str = "ODOO_PORT";
/// Environment variable holding the database name
pub const ENV_DB: &str = "ODOO_DB";
/// Environment variable holding the login
pub const ENV_USER: &str = "ODOO_USER";
/// Environment variable holding the password or API key
pub const ENV_PASSWORD: &str = "ODOO_PASSWORD";
/// Environment variable holding the per-request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "ODOO_TIMEOUT_SECS";
/// Environment variable enabling the local session guard
pub const ENV_REQUIRE_SESSION: &str = "ODOO_REQUIRE_SESSION";

/// Connection settings for one client
///
/// # Example
///
/// ```rust
/// use odoo_rpc::ClientConfig;
///
/// let config = ClientConfig::new("https://erp.example.com", "mydb", "admin", "secret")
///     .with_port(8069)
///     .with_timeout_secs(30);
/// assert_eq!(config.port, Some(8069));
/// ```
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server URL including scheme (`http` or `https`)
    pub url: String,
    /// Overrides the port from `url`
    #[serde(default)]
    pub port: Option<u16>,
    pub db: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout applied by the transport
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Refuse non-authentication calls locally until `connect()` has succeeded
    #[serde(default)]
    pub require_session: bool,
}

impl ClientConfig {
    pub fn new(
        url: impl Into<String>,
        db: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            port: None,
            db: db.into(),
            username: username.into(),
            password: password.into(),
            timeout_secs: None,
            require_session: false,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_require_session(mut self, require: bool) -> Self {
        self.require_session = require;
        self
    }

    /// The transport timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Read the configuration from `ODOO_*` environment variables
    ///
    /// `ODOO_URL`, `ODOO_DB`, `ODOO_USER` and `ODOO_PASSWORD` are required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OdooError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            OdooError::Configuration(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| OdooError::Configuration(format!("{} is not set", key)))
        };

        let mut config = Self::new(
            required(ENV_URL)?,
            required(ENV_DB)?,
            required(ENV_USER)?,
            required(ENV_PASSWORD)?,
        );

        if let Some(port) = lookup(ENV_PORT) {
            config.port = Some(port.parse().map_err(|_| {
                OdooError::Configuration(format!("{} must be a port number, got {:?}", ENV_PORT, port))
            })?);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = Some(secs.parse().map_err(|_| {
                OdooError::Configuration(format!(
                    "{} must be a number of seconds, got {:?}",
                    ENV_TIMEOUT_SECS, secs
                ))
            })?);
        }
        if let Some(flag) = lookup(ENV_REQUIRE_SESSION) {
            config.require_session = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("port", &self.port)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .field("require_session", &self.require_session)
            .finish()
    }
}
