//! odoo-rpc command line client
//!
//! Runs a single call against an Odoo server and prints the result as JSON.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- version
//! cargo run -- login
//! cargo run -- execute res.partner search_read '[[["is_company", "=", true]]]' --kwargs '{"fields": ["name"]}'
//! cargo run -- workflow account.invoice invoice_open '[42]'
//! cargo run -- report account.report_invoice '[[42]]'
//! ```
//!
//! ## Environment Variables
//!
//! - `ODOO_URL`: Server URL, e.g. "https://erp.example.com:8069"
//! - `ODOO_DB`, `ODOO_USER`, `ODOO_PASSWORD`: Credentials
//! - `ODOO_PORT`: Port override
//! - `ODOO_TIMEOUT_SECS`: Per-request timeout
//! - `RUST_LOG`: Logging level (default: "odoo_rpc=info")

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use odoo_rpc::{ClientConfig, OdooClient, Value};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "odoo-rpc")]
#[command(about = "Call an Odoo server over XML-RPC")]
struct Args {
    /// Read connection settings from a JSON file instead of the environment
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server URL
    #[arg(long)]
    url: Option<String>,

    /// Port, overriding the one in the URL
    #[arg(long)]
    port: Option<u16>,

    /// Database name
    #[arg(long)]
    db: Option<String>,

    /// Login
    #[arg(long)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print the server version (no login)
    Version,
    /// Log in and print the user id
    Login,
    /// Call a model method through execute_kw
    Execute {
        model: String,
        method: String,
        /// Positional arguments as a JSON array
        #[arg(default_value = "[]", value_parser = parse_json)]
        params: serde_json::Value,
        /// Keyword arguments as a JSON object
        #[arg(long, value_parser = parse_json)]
        kwargs: Option<serde_json::Value>,
    },
    /// Send a workflow signal
    Workflow {
        model: String,
        signal: String,
        /// Arguments as a JSON array
        #[arg(default_value = "[]", value_parser = parse_json)]
        params: serde_json::Value,
    },
    /// Render a report
    Report {
        report: String,
        /// Arguments as a JSON array
        #[arg(default_value = "[]", value_parser = parse_json)]
        params: serde_json::Value,
    },
}

fn parse_json(raw: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))
}

fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };

    if let Some(url) = &args.url {
        config.url = url.clone();
    }
    if let Some(port) = args.port {
        config.port = Some(port);
    }
    if let Some(db) = &args.db {
        config.db = db.clone();
    }
    if let Some(user) = &args.user {
        config.username = user.clone();
    }

    Ok(config)
}

/// Positional arguments from a JSON array
fn positional(json: serde_json::Value) -> anyhow::Result<Vec<Value>> {
    match Value::from(json) {
        Value::Array(items) => Ok(items),
        other => bail!("arguments must be a JSON array, got {:?}", other),
    }
}

async fn login(client: &OdooClient) -> anyhow::Result<()> {
    if !client.connect().await? {
        bail!(
            "login rejected for {} on {}",
            client.session().username(),
            client.session().db()
        );
    }
    Ok(())
}

async fn run(client: &OdooClient, command: Command) -> anyhow::Result<Value> {
    let value = match command {
        Command::Version => client.server_version().await?,
        Command::Login => {
            login(client).await?;
            Value::Int(client.uid())
        }
        Command::Execute {
            model,
            method,
            params,
            kwargs,
        } => {
            let params = positional(params)?;
            login(client).await?;
            client
                .execute_kw(&model, &method, params, kwargs.map(Value::from))
                .await?
        }
        Command::Workflow {
            model,
            signal,
            params,
        } => {
            let params = positional(params)?;
            login(client).await?;
            client.exec_workflow(&model, &signal, params).await?
        }
        Command::Report { report, params } => {
            let params = positional(params)?;
            login(client).await?;
            client.render_report(&report, params).await?
        }
    };

    Ok(value)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "odoo_rpc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(&args).context("failed to load configuration")?;
    let client = OdooClient::new(config)?;

    let value = run(&client, args.command).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::from(value))?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_version() {
        let args = Args::try_parse_from(["odoo-rpc", "version"]).unwrap();
        assert_eq!(args.command, Command::Version);
        assert!(args.url.is_none());
    }

    #[test]
    fn test_parse_execute() {
        let args = Args::try_parse_from([
            "odoo-rpc",
            "--url",
            "https://erp.example.com",
            "execute",
            "res.partner",
            "search_read",
            "[[]]",
            "--kwargs",
            r#"{"limit": 5}"#,
        ])
        .unwrap();

        assert_eq!(args.url.as_deref(), Some("https://erp.example.com"));
        assert_eq!(
            args.command,
            Command::Execute {
                model: "res.partner".to_string(),
                method: "search_read".to_string(),
                params: json!([[]]),
                kwargs: Some(json!({"limit": 5})),
            }
        );
    }

    #[test]
    fn test_parse_report_default_params() {
        let args = Args::try_parse_from(["odoo-rpc", "report", "account.report_invoice"]).unwrap();
        assert_eq!(
            args.command,
            Command::Report {
                report: "account.report_invoice".to_string(),
                params: json!([]),
            }
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(Args::try_parse_from(["odoo-rpc", "workflow", "m", "s", "[1,"]).is_err());
    }

    #[test]
    fn test_positional_requires_array() {
        assert_eq!(
            positional(json!([1, "a"])).unwrap(),
            vec![Value::Int(1), Value::from("a")]
        );
        assert!(positional(json!({"a": 1})).is_err());
    }
}
