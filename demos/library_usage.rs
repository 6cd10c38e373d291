//! Library usage example
//!
//! Run with: cargo run --example library_usage
//!
//! This example demonstrates how to use odoo-rpc as a library in your own application.
//! It reads `ODOO_URL`, `ODOO_DB`, `ODOO_USER` and `ODOO_PASSWORD` from the environment.

use odoo_rpc::{ClientConfig, OdooClient, Value};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("odoo-rpc Library Usage Example\n");

    let config = ClientConfig::from_env()?;
    let client = OdooClient::new(config)?;

    // Check the server before logging in
    let version = client.server_version().await?;
    println!(
        "✓ Server version: {}",
        version
            .get("server_version")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    );

    // Log in
    if !client.connect().await? {
        println!("✗ Login rejected");
        return Ok(());
    }
    println!("✓ Logged in as uid {}", client.uid());

    // Check access rights
    let allowed = client
        .execute_kw(
            "res.partner",
            "check_access_rights",
            vec![Value::from("read")],
            Some(json!({"raise_exception": false}).into()),
        )
        .await?;
    println!("✓ Read access on res.partner: {:?}", allowed);

    // Search companies
    let ids = client
        .execute_kw(
            "res.partner",
            "search",
            vec![json!([["is_company", "=", true]]).into()],
            Some(json!({"limit": 5}).into()),
        )
        .await?;
    println!("✓ First company ids: {:?}", ids);

    // Read a few fields of those records
    let records = client
        .execute_kw(
            "res.partner",
            "read",
            vec![ids],
            Some(json!({"fields": ["name", "country_id"]}).into()),
        )
        .await?;
    let records: serde_json::Value = records.into();
    println!("✓ Records:\n{}", serde_json::to_string_pretty(&records)?);

    // Create and then delete a partner
    let id = client
        .execute_kw(
            "res.partner",
            "create",
            vec![json!({"name": "odoo-rpc example"}).into()],
            None,
        )
        .await?;
    println!("✓ Created partner {:?}", id);

    client
        .execute_kw("res.partner", "unlink", vec![Value::Array(vec![id])], None)
        .await?;
    println!("✓ Deleted it again");

    // Faults keep the server's code and message
    match client.execute_kw("res.partnr", "search", vec![], None).await {
        Ok(_) => println!("✗ Unknown model was accepted"),
        Err(e) => match e.fault() {
            Some(fault) => println!("✓ Server fault {}: {}", fault.code, fault.message),
            None => println!("✗ Unexpected error: {}", e),
        },
    }

    println!("\n✅ All operations completed successfully!");

    Ok(())
}
