//! Error types for odoo-rpc
//!
//! Transport failures and server faults are carried through untouched; this layer adds only the
//! errors that arise before a request is ever sent.

use odoo_rpc_transport::{Error as TransportError, Fault, Value};
use thiserror::Error;

/// Result type alias for odoo-rpc operations
pub type Result<T> = std::result::Result<T, OdooError>;

/// Error types for odoo-rpc operations
#[derive(Debug, Error)]
pub enum OdooError {
    /// Invalid or incomplete client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The configured URL could not be parsed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Transport failure or server fault, exactly as reported by the transport
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Authentication returned something other than a user id or `false`
    #[error("Unexpected response from {method}: {value:?}")]
    UnexpectedResponse { method: &'static str, value: Value },

    /// The local session guard refused a call made before authentication
    #[error("Not authenticated: call connect() first")]
    Unauthenticated,

    /// A callback-style call was made outside a tokio runtime
    #[error("No async runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
}

impl OdooError {
    /// The XML-RPC fault returned by the server, if that is what this error is
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            OdooError::Transport(e) => e.fault(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = OdooError::Configuration("missing host".to_string());
        assert_eq!(error.to_string(), "Configuration error: missing host");

        let error = OdooError::Unauthenticated;
        assert_eq!(error.to_string(), "Not authenticated: call connect() first");
    }

    #[test]
    fn test_runtime_error_outside_tokio() {
        let err = tokio::runtime::Handle::try_current().unwrap_err();
        let error = OdooError::from(err);
        assert!(error.to_string().starts_with("No async runtime: "));
        assert!(error.fault().is_none());
    }

    #[test]
    fn test_fault_passthrough() {
        let fault = Fault::new(2, "Object res.partnr doesn't exist");
        let error = OdooError::from(TransportError::Fault(fault.clone()));

        assert_eq!(error.fault(), Some(&fault));
        assert_eq!(error.to_string(), fault.to_string());
    }

    #[test]
    fn test_non_transport_has_no_fault() {
        assert!(OdooError::Unauthenticated.fault().is_none());
    }
}
