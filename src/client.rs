//! Public client for an Odoo server
//!
//! Provides [`OdooClient`], the entry point for authenticating and calling the server.

use crate::auth;
use crate::config::ClientConfig;
use crate::error::{OdooError, Result};
use crate::invocation::{Invocation, Operation};
use crate::session::SessionState;
use crate::transport::{HttpTransportFactory, TransportFactory};
use odoo_rpc_transport::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Client for one Odoo database and user
///
/// This struct is cheaply cloneable (uses Arc internally) and clones share the same session, so
/// authenticating through one clone authenticates them all.
///
/// Each call builds a new transport; no connection is kept between calls.
///
/// # Example
///
/// ```rust,no_run
/// use odoo_rpc::{ClientConfig, OdooClient, Value};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::new("https://erp.example.com:8069", "mydb", "admin", "secret");
///     let client = OdooClient::new(config)?;
///
///     client.connect().await?;
///
///     let ids = client
///         .execute_kw("res.partner", "search", vec![Value::Array(vec![])], None)
///         .await?;
///     println!("{:?}", ids);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct OdooClient {
    session: Arc<SessionState>,
    transport: Arc<dyn TransportFactory>,
    require_session: bool,
}

impl OdooClient {
    /// Create a client that talks XML-RPC over HTTP(S)
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is malformed or not `http`/`https`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransportFactory::new(config.timeout()));
        Self::with_transport(config, transport)
    }

    /// Create a client that obtains its invokers from `transport`
    ///
    /// Useful for testing or for routing calls through a custom transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn TransportFactory>,
    ) -> Result<Self> {
        let session = SessionState::from_config(&config)?;
        tracing::debug!("Created client for {:?}", session);

        Ok(Self {
            session: Arc::new(session),
            transport,
            require_session: config.require_session,
        })
    }

    /// The session shared by this client and its clones
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The authenticated user id, `0` before a successful [`connect`](Self::connect)
    pub fn uid(&self) -> i64 {
        self.session.uid()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Log in and remember the user id for later calls
    ///
    /// # Returns
    ///
    /// `true` when the server accepted the credentials, `false` when it rejected them
    pub async fn connect(&self) -> Result<bool> {
        auth::authenticate(self.transport.as_ref(), &self.session).await
    }

    /// Same as [`connect`](Self::connect)
    pub async fn authenticate(&self) -> Result<bool> {
        self.connect().await
    }

    /// Ask the server for its version information; needs no credentials
    pub async fn server_version(&self) -> Result<Value> {
        Invocation::version()
            .send(self.transport.as_ref(), &self.session)
            .await
    }

    /// Call `method` on `model` through `execute_kw`
    ///
    /// # Arguments
    ///
    /// * `model` - Model name (e.g., "res.partner")
    /// * `method` - Model method (e.g., "search_read")
    /// * `params` - Positional arguments, sent as one array
    /// * `kwargs` - Optional keyword arguments struct (e.g., `{"fields": [...], "limit": 5}`)
    ///
    /// # Returns
    ///
    /// Whatever the remote method returns, unmodified
    pub async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        params: Vec<Value>,
        kwargs: Option<Value>,
    ) -> Result<Value> {
        self.ensure_session()?;
        let extra = vec![Value::from(model), Value::from(method), Value::Array(params)];
        Invocation::authenticated(&self.session, Operation::ExecuteKw, extra, kwargs)
            .send(self.transport.as_ref(), &self.session)
            .await
    }

    /// Send workflow signal `method` to `model`, spreading `params` positionally
    pub async fn exec_workflow(
        &self,
        model: &str,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value> {
        self.ensure_session()?;
        let mut extra = Vec::with_capacity(2 + params.len());
        extra.push(Value::from(model));
        extra.push(Value::from(method));
        extra.extend(params);
        Invocation::authenticated(&self.session, Operation::ExecWorkflow, extra, None)
            .send(self.transport.as_ref(), &self.session)
            .await
    }

    /// Render `report`, spreading `params` positionally
    pub async fn render_report(&self, report: &str, params: Vec<Value>) -> Result<Value> {
        self.ensure_session()?;
        let mut extra = Vec::with_capacity(1 + params.len());
        extra.push(Value::from(report));
        extra.extend(params);
        Invocation::authenticated(&self.session, Operation::RenderReport, extra, None)
            .send(self.transport.as_ref(), &self.session)
            .await
    }

    /// [`exec_workflow`](Self::exec_workflow) with completion delivered to `callback`
    ///
    /// The call runs as a task on the current tokio runtime and `callback` is invoked exactly
    /// once with its outcome.
    ///
    /// # Returns
    ///
    /// The task handle, or `None` when there is no current runtime. In that case `callback` has
    /// already received [`OdooError::Runtime`] and nothing was sent.
    pub fn exec_workflow_with_callback<F>(
        &self,
        model: &str,
        method: &str,
        params: Vec<Value>,
        callback: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<Value>) + Send + 'static,
    {
        let client = self.clone();
        let model = model.to_string();
        let method = method.to_string();
        spawn_with_callback(
            async move { client.exec_workflow(&model, &method, params).await },
            callback,
        )
    }

    /// [`render_report`](Self::render_report) with completion delivered to `callback`
    ///
    /// Same execution rules as [`exec_workflow_with_callback`](Self::exec_workflow_with_callback).
    pub fn render_report_with_callback<F>(
        &self,
        report: &str,
        params: Vec<Value>,
        callback: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<Value>) + Send + 'static,
    {
        let client = self.clone();
        let report = report.to_string();
        spawn_with_callback(
            async move { client.render_report(&report, params).await },
            callback,
        )
    }

    fn ensure_session(&self) -> Result<()> {
        if self.require_session && !self.session.is_authenticated() {
            tracing::warn!("Refusing call before authentication");
            return Err(OdooError::Unauthenticated);
        }
        Ok(())
    }
}

fn spawn_with_callback<T, F>(task: T, callback: F) -> Option<JoinHandle<()>>
where
    T: Future<Output = Result<Value>> + Send + 'static,
    F: FnOnce(Result<Value>) + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Some(handle.spawn(async move { callback(task.await) })),
        Err(e) => {
            tracing::error!("Cannot run callback call: {}", e);
            callback(Err(OdooError::Runtime(e)));
            None
        }
    }
}

impl std::fmt::Debug for OdooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdooClient")
            .field("session", &self.session)
            .field("require_session", &self.require_session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::RpcPath;
    use crate::transport::{MethodInvoker, MockMethodInvoker, MockTransportFactory};

    fn config() -> ClientConfig {
        ClientConfig::new("https://erp.example.com:8069", "mydb", "admin", "secret")
    }

    /// A factory whose invokers check `expected` and answer `answer`
    fn expecting(
        path: RpcPath,
        method: &'static str,
        expected: Vec<Value>,
        answer: Value,
    ) -> MockTransportFactory {
        let mut factory = MockTransportFactory::new();
        factory
            .expect_create()
            .withf(move |endpoint, secure| endpoint.path == path && *secure)
            .times(1)
            .returning(move |_, _| {
                let expected = expected.clone();
                let answer = answer.clone();
                let mut invoker = MockMethodInvoker::new();
                invoker
                    .expect_invoke()
                    .withf(move |m, params| m == method && *params == expected)
                    .times(1)
                    .returning(move |_, _| Ok(answer.clone()));
                Ok(Box::new(invoker) as Box<dyn MethodInvoker>)
            });
        factory
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let config = ClientConfig::new("mailto:admin@example.com", "db", "u", "p");
        assert!(OdooClient::new(config).is_err());
    }

    #[tokio::test]
    async fn test_execute_kw_without_kwargs() {
        let expected = vec![
            Value::from("mydb"),
            Value::Int(0),
            Value::from("secret"),
            Value::from("res.partner"),
            Value::from("search"),
            Value::Array(vec![Value::Array(vec![])]),
        ];
        let factory = expecting(RpcPath::Object, "execute_kw", expected, Value::from(vec![1, 2]));
        let client = OdooClient::with_transport(config(), Arc::new(factory)).unwrap();

        let ids = client
            .execute_kw("res.partner", "search", vec![Value::Array(vec![])], None)
            .await
            .unwrap();
        assert_eq!(ids, Value::from(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_exec_workflow_spreads_params() {
        let expected = vec![
            Value::from("mydb"),
            Value::Int(0),
            Value::from("secret"),
            Value::from("account.invoice"),
            Value::from("invoice_open"),
            Value::Int(12),
        ];
        let factory = expecting(RpcPath::Object, "exec_workflow", expected, Value::Bool(true));
        let client = OdooClient::with_transport(config(), Arc::new(factory)).unwrap();

        let result = client
            .exec_workflow("account.invoice", "invoice_open", vec![Value::Int(12)])
            .await
            .unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[tokio::test]
    async fn test_render_report_callback() {
        let expected = vec![
            Value::from("mydb"),
            Value::Int(0),
            Value::from("secret"),
            Value::from("account.report_invoice"),
            Value::from(vec![3]),
        ];
        let factory = expecting(RpcPath::Report, "render_report", expected, Value::Int(99));
        let client = OdooClient::with_transport(config(), Arc::new(factory)).unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel();
        let params = vec![Value::from(vec![3])];
        client
            .render_report_with_callback("account.report_invoice", params, move |result| {
                let _ = tx.send(result);
            })
            .unwrap()
            .await
            .unwrap();

        assert_eq!(rx.await.unwrap().unwrap(), Value::Int(99));
    }

    #[tokio::test]
    async fn test_require_session_fails_fast() {
        let mut factory = MockTransportFactory::new();
        factory.expect_create().never();
        let client = OdooClient::with_transport(
            config().with_require_session(true),
            Arc::new(factory),
        )
        .unwrap();

        let err = client
            .execute_kw("res.partner", "search", vec![], None)
            .await
            .unwrap_err();
        assert!(matches!(err, OdooError::Unauthenticated));

        let err = client.render_report("r", vec![]).await.unwrap_err();
        assert!(matches!(err, OdooError::Unauthenticated));
    }

    #[test]
    fn test_callback_without_runtime_reports_error() {
        let mut factory = MockTransportFactory::new();
        factory.expect_create().never();
        let client = OdooClient::with_transport(config(), Arc::new(factory)).unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let handle = client.exec_workflow_with_callback("sale.order", "order_confirm", vec![], {
            let tx = tx.clone();
            move |result| {
                let _ = tx.send(result);
            }
        });
        assert!(handle.is_none());
        assert!(matches!(rx.recv().unwrap(), Err(OdooError::Runtime(_))));

        let handle = client.render_report_with_callback("r", vec![], move |result| {
            let _ = tx.send(result);
        });
        assert!(handle.is_none());
        assert!(matches!(rx.recv().unwrap(), Err(OdooError::Runtime(_))));
    }

    #[test]
    fn test_debug_hides_password() {
        let client = OdooClient::new(config()).unwrap();
        assert!(!format!("{:?}", client).contains("secret"));
    }
}
