//! Positional parameter assembly and dispatch
//!
//! Every authenticated call sends `[db, uid, password, ...]`. The order is fixed by the server;
//! nothing here is named.

use crate::endpoint::RpcPath;
use crate::error::Result;
use crate::session::SessionState;
use crate::transport::TransportFactory;
use odoo_rpc_transport::Value;

/// The remote operations this client knows how to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Authenticate,
    Version,
    ExecuteKw,
    ExecWorkflow,
    RenderReport,
}

impl Operation {
    /// The service the operation is sent to
    pub fn path(&self) -> RpcPath {
        match self {
            Operation::Authenticate | Operation::Version => RpcPath::Common,
            Operation::ExecuteKw | Operation::ExecWorkflow => RpcPath::Object,
            Operation::RenderReport => RpcPath::Report,
        }
    }

    /// The remote method name
    pub fn method_name(&self) -> &'static str {
        match self {
            Operation::Authenticate => "authenticate",
            Operation::Version => "version",
            Operation::ExecuteKw => "execute_kw",
            Operation::ExecWorkflow => "exec_workflow",
            Operation::RenderReport => "render_report",
        }
    }
}

/// One call ready to be sent: an operation and its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub operation: Operation,
    pub params: Vec<Value>,
}

impl Invocation {
    /// `[db, uid, password, ...extra]`, plus `trailing` as one last element when given
    ///
    /// `extra` is passed through unchecked; the server is the one to reject bad arguments.
    pub fn build_params(
        session: &SessionState,
        extra: Vec<Value>,
        trailing: Option<Value>,
    ) -> Vec<Value> {
        let mut params = Vec::with_capacity(3 + extra.len() + usize::from(trailing.is_some()));
        params.push(Value::from(session.db()));
        params.push(Value::Int(session.uid()));
        params.push(Value::from(session.password()));
        params.extend(extra);
        params.extend(trailing);
        params
    }

    /// An operation carrying the session's credential prefix
    pub fn authenticated(
        session: &SessionState,
        operation: Operation,
        extra: Vec<Value>,
        trailing: Option<Value>,
    ) -> Self {
        Self {
            operation,
            params: Self::build_params(session, extra, trailing),
        }
    }

    /// The login handshake: `[db, username, password, {}]`
    pub fn authenticate(session: &SessionState) -> Self {
        Self {
            operation: Operation::Authenticate,
            params: vec![
                Value::from(session.db()),
                Value::from(session.username()),
                Value::from(session.password()),
                Value::empty_struct(),
            ],
        }
    }

    /// The unauthenticated server version probe
    pub fn version() -> Self {
        Self {
            operation: Operation::Version,
            params: Vec::new(),
        }
    }

    /// Send over a fresh invoker from `factory`
    ///
    /// The invoker is dropped when the call completes. Errors from the transport, including
    /// server faults, are returned as they are.
    pub async fn send(self, factory: &dyn TransportFactory, session: &SessionState) -> Result<Value> {
        let endpoint = session.endpoint(self.operation.path());
        let method = self.operation.method_name();
        tracing::debug!(
            "{} {} on {}:{} ({} params)",
            endpoint.path,
            method,
            endpoint.host,
            endpoint.port,
            self.params.len()
        );

        let invoker = factory.create(&endpoint, session.secure())?;
        let result = invoker.invoke(method, self.params).await;

        result.map_err(|e| {
            tracing::error!("{} {} failed: {}", endpoint.path, method, e);
            e.into()
        })
    }
}
