//! Transport seam between the client and the XML-RPC wire
//!
//! The client never talks to the network directly: every call asks a [`TransportFactory`] for a
//! fresh [`MethodInvoker`] bound to one endpoint, uses it once and drops it.

use crate::endpoint::Endpoint;
use async_trait::async_trait;
use odoo_rpc_transport::{Error as TransportError, HttpInvoker, Value};
use std::time::Duration;

/// Performs one remote method call against the endpoint it was created for
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MethodInvoker: Send + Sync {
    async fn invoke(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError>;
}

/// Creates a [`MethodInvoker`] for an endpoint, over TLS when `secure` is set
#[cfg_attr(test, mockall::automock)]
pub trait TransportFactory: Send + Sync {
    fn create(
        &self,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<Box<dyn MethodInvoker>, TransportError>;
}

#[async_trait]
impl MethodInvoker for HttpInvoker {
    async fn invoke(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        self.call(method, &params).await
    }
}

/// Default factory: one [`HttpInvoker`] (and so one HTTP client) per call
#[derive(Debug, Clone, Default)]
pub struct HttpTransportFactory {
    timeout: Option<Duration>,
}

impl HttpTransportFactory {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl TransportFactory for HttpTransportFactory {
    fn create(
        &self,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<Box<dyn MethodInvoker>, TransportError> {
        let invoker = HttpInvoker::new(endpoint.url(secure), self.timeout)?;
        Ok(Box::new(invoker))
    }
}
