//! Error types for the XML-RPC transport

use thiserror::Error;

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, Error>;

/// A fault returned by the remote server inside a `<fault>` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Server-provided `faultCode`, or `0` when the server sent a non-numeric code
    pub code: i64,
    /// Raw `faultCode` text, when the server sent it as a string
    pub code_text: Option<String>,
    /// Server-provided `faultString`, or the code text when there is none
    pub message: String,
}

impl Fault {
    /// Fault with a numeric code
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            code_text: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code_text {
            Some(text) if *text == self.message => write!(f, "XML-RPC fault: {}", text),
            Some(text) => write!(f, "XML-RPC fault {}: {}", text, self.message),
            None => write!(f, "XML-RPC fault {}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for Fault {}

/// Everything that can go wrong between building a request and decoding its response
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, TLS or protocol-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered with an XML-RPC fault
    #[error(transparent)]
    Fault(#[from] Fault),

    /// The response body is not a valid XML-RPC response
    #[error("Invalid XML-RPC response: {0}")]
    Parse(String),

    /// Low-level XML syntax error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl Error {
    /// The server fault carried by this error, if any
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Error::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_display() {
        let fault = Fault::new(3, "Access Denied");
        assert_eq!(fault.to_string(), "XML-RPC fault 3: Access Denied");

        let error = Error::from(fault.clone());
        assert_eq!(error.to_string(), "XML-RPC fault 3: Access Denied");
        assert_eq!(error.fault(), Some(&fault));
    }

    #[test]
    fn test_fault_display_with_text_code() {
        let fault = Fault {
            code: 0,
            code_text: Some("warning -- Access denied".to_string()),
            message: "Traceback (most recent call last)".to_string(),
        };
        assert_eq!(
            fault.to_string(),
            "XML-RPC fault warning -- Access denied: Traceback (most recent call last)"
        );

        let fault = Fault {
            code: 0,
            code_text: Some("Oops".to_string()),
            message: "Oops".to_string(),
        };
        assert_eq!(fault.to_string(), "XML-RPC fault: Oops");
    }

    #[test]
    fn test_non_fault_has_no_fault() {
        let error = Error::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert!(error.fault().is_none());
        assert_eq!(error.to_string(), "Unexpected HTTP status 502: Bad Gateway");
    }
}
