//! Login handshake against the common service

use crate::error::{OdooError, Result};
use crate::invocation::Invocation;
use crate::session::SessionState;
use crate::transport::TransportFactory;
use odoo_rpc_transport::Value;

/// Authenticate `session` and record the returned user id
///
/// Returns `Ok(true)` once the server hands back a user id. Odoo rejects bad credentials by
/// returning `false` instead of raising a fault; that yields `Ok(false)` and leaves the session
/// unauthenticated. Transport errors and faults are returned unmodified and also leave `uid`
/// untouched.
pub async fn authenticate(factory: &dyn TransportFactory, session: &SessionState) -> Result<bool> {
    if session.secure() {
        tracing::info!("Client over HTTPS port {}", session.port());
    } else {
        tracing::info!("Client over HTTP");
    }

    let value = Invocation::authenticate(session).send(factory, session).await?;

    match value {
        Value::Int(uid) => {
            session.set_uid(uid);
            tracing::info!(
                "Authenticated {} on {} as uid {}",
                session.username(),
                session.db(),
                uid
            );
            Ok(true)
        }
        Value::Bool(false) => {
            tracing::warn!(
                "Login rejected for {} on {}",
                session.username(),
                session.db()
            );
            Ok(false)
        }
        value => Err(OdooError::UnexpectedResponse {
            method: "authenticate",
            value,
        }),
    }
}
