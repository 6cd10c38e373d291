//! # odoo-rpc-transport
//!
//! XML-RPC value model, wire codec and HTTP transport used by `odoo-rpc`.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! odoo-rpc-transport = { path = "../odoo-rpc-transport" }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use odoo_rpc_transport::{HttpInvoker, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let invoker = HttpInvoker::new("http://127.0.0.1:8069/xmlrpc/2/common", None)?;
//!     let version = invoker.call("version", &[]).await?;
//!     println!("{:?}", version.get("server_version"));
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod invoker;
pub mod value;

pub use codec::{decode_response, encode_request};
pub use error::{Error, Fault, Result};
pub use invoker::HttpInvoker;
pub use value::Value;
