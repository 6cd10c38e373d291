//! Callback-style calls
//!
//! Run with: cargo run --example callbacks -- <invoice id>
//!
//! Workflow signals and report rendering can deliver their outcome to a completion callback
//! instead of being awaited, for integrations built around that style.

use odoo_rpc::{ClientConfig, OdooClient, Value};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let invoice_id: i64 = std::env::args()
        .nth(1)
        .ok_or("usage: callbacks <invoice id>")?
        .parse()?;

    let client = OdooClient::new(ClientConfig::from_env()?)?;
    if !client.connect().await? {
        return Err("login rejected".into());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();

    let workflow_tx = tx.clone();
    client.exec_workflow_with_callback(
        "account.invoice",
        "invoice_open",
        vec![Value::Int(invoice_id)],
        move |result| {
            let _ = workflow_tx.send(("workflow", result));
        },
    );

    client.render_report_with_callback(
        "account.report_invoice",
        vec![Value::from(vec![invoice_id])],
        move |result| {
            let _ = tx.send(("report", result));
        },
    );

    while let Some((name, result)) = rx.recv().await {
        match result {
            Ok(value) => println!("✓ {} finished: {:?}", name, value),
            Err(e) => println!("✗ {} failed: {}", name, e),
        }
    }

    Ok(())
}
