//! RPC endpoint resolution

use std::fmt;

/// The XML-RPC services exposed by an Odoo server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcPath {
    /// Unauthenticated service: `authenticate`, `version`
    Common,
    /// Model methods and workflow signals
    Object,
    /// Report rendering
    Report,
}

impl RpcPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcPath::Common => crate::COMMON_PATH,
            RpcPath::Object => crate::OBJECT_PATH,
            RpcPath::Report => crate::REPORT_PATH,
        }
    }
}

impl fmt::Display for RpcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a single call is sent. Built per call and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: RpcPath,
}

impl Endpoint {
    /// Resolve the endpoint for `path` on `host:port`
    pub fn resolve(host: &str, port: u16, path: RpcPath) -> Self {
        Self {
            host: host.to_string(),
            port,
            path,
        }
    }

    /// The full URL of this endpoint over plain or encrypted HTTP
    pub fn url(&self, secure: bool) -> String {
        let scheme = if secure { "https" } else { "http" };
        format!("{}://{}:{}{}", scheme, self.host, self.port, self.path)
    }
}
