//! Session state owned by one client

use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, RpcPath};
use crate::error::{OdooError, Result};
use std::sync::atomic::{AtomicI64, Ordering};
use url::Url;

/// `uid` value meaning "not authenticated"
pub const UNAUTHENTICATED_UID: i64 = 0;

/// Credentials and connection target for one client, plus the authenticated user id
///
/// Everything except `uid` is fixed at construction. `uid` is written by authentication only
/// and read by every other call.
pub struct SessionState {
    host: String,
    port: u16,
    db: String,
    username: String,
    password: String,
    secure: bool,
    uid: AtomicI64,
}

impl SessionState {
    /// Build the session from a configuration
    ///
    /// # Errors
    ///
    /// Returns [`OdooError::Url`] if the URL does not parse, and [`OdooError::Configuration`]
    /// if its scheme is not `http`/`https` or it has no host
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let url = Url::parse(&config.url).map_err(|e| {
            tracing::error!("Invalid server URL {:?}: {}", config.url, e);
            e
        })?;

        let secure = match url.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(OdooError::Configuration(format!(
                    "unsupported scheme {:?}, expected http or https",
                    other
                )))
            }
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| OdooError::Configuration(format!("no host in {:?}", config.url)))?
            .to_string();

        let port = config
            .port
            .or_else(|| url.port_or_known_default())
            .ok_or_else(|| OdooError::Configuration(format!("no port for {:?}", config.url)))?;

        Ok(Self {
            host,
            port,
            db: config.db.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            secure,
            uid: AtomicI64::new(UNAUTHENTICATED_UID),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &str {
        &self.db
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Whether calls go over HTTPS
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// The authenticated user id, or [`UNAUTHENTICATED_UID`]
    pub fn uid(&self) -> i64 {
        self.uid.load(Ordering::Acquire)
    }

    pub fn is_authenticated(&self) -> bool {
        self.uid() != UNAUTHENTICATED_UID
    }

    pub(crate) fn set_uid(&self, uid: i64) {
        self.uid.store(uid, Ordering::Release);
    }

    /// Resolve the endpoint for `path` on this session's server
    pub fn endpoint(&self, path: RpcPath) -> Endpoint {
        Endpoint::resolve(&self.host, self.port, path)
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("password", &"***")
            .field("secure", &self.secure)
            .field("uid", &self.uid())
            .finish()
    }
}
