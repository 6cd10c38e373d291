//! # odoo-rpc
//!
//! A lightweight async client for the Odoo XML-RPC API.
//!
//! ## Features
//!
//! - **Session handling**: authenticate once, the user id is threaded through every later call
//! - **Model methods**: `execute_kw` with positional arguments and keyword arguments
//! - **Legacy services**: workflow signals and report rendering, with async and callback forms
//! - **Pluggable transport**: calls go through a [`TransportFactory`], so tests can swap the network out
//! - **Faults as-is**: server faults reach the caller with their code and message untouched
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use odoo_rpc::{ClientConfig, OdooClient, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OdooClient::new(ClientConfig::from_env()?)?;
//!
//!     if !client.connect().await? {
//!         return Err("login rejected".into());
//!     }
//!
//!     let partners = client
//!         .execute_kw(
//!             "res.partner",
//!             "search_read",
//!             vec![Value::Array(vec![])],
//!             Some(serde_json::json!({"fields": ["name"], "limit": 5}).into()),
//!         )
//!         .await?;
//!     println!("{:?}", partners);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod invocation;
pub mod session;
pub mod transport;

pub use client::OdooClient;
pub use config::ClientConfig;
pub use endpoint::{Endpoint, RpcPath};
pub use error::{OdooError, Result};
pub use invocation::{Invocation, Operation};
pub use session::{SessionState, UNAUTHENTICATED_UID};
pub use transport::{HttpTransportFactory, MethodInvoker, TransportFactory};

// Re-export commonly used types
pub use odoo_rpc_transport::{Error as TransportError, Fault, Value};

/// Path of the common service (`authenticate`, `version`)
pub const COMMON_PATH: &str = "/xmlrpc/2/common";

/// Path of the object service (`execute_kw`, `exec_workflow`)
pub const OBJECT_PATH: &str = "/xmlrpc/2/object";

/// Path of the report service (`render_report`)
pub const REPORT_PATH: &str = "/xmlrpc/2/report";
