//! HTTP transport for XML-RPC calls

use crate::codec::{decode_response, encode_request};
use crate::error::{Error, Result};
use crate::value::Value;
use std::time::Duration;

/// Sends XML-RPC calls to a single endpoint URL
///
/// Each invoker owns its own `reqwest::Client`; nothing is shared between invokers.
#[derive(Debug)]
pub struct HttpInvoker {
    client: reqwest::Client,
    url: String,
}

impl HttpInvoker {
    /// Create an invoker bound to `url` (e.g. `https://erp.example.com:8069/xmlrpc/2/object`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (for instance when the TLS backend
    /// fails to initialize)
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            e
        })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The endpoint URL this invoker posts to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` with positional `params`
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] when the request cannot be sent or the body cannot be read
    /// - [`Error::Status`] for a non-success HTTP status
    /// - [`Error::Fault`] when the server answers with an XML-RPC fault
    /// - [`Error::Parse`] / [`Error::Xml`] for an unencodable parameter or a malformed response body
    pub async fn call(&self, method: &str, params: &[Value]) -> Result<Value> {
        let body = encode_request(method, params)?;
        tracing::trace!("POST {} {}", self.url, method);

        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|e| {
                tracing::warn!("Failed to read error body: {}", e);
                String::new()
            });
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        decode_response(&text)
    }
}
