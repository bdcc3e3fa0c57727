//! # beacond
//!
//! Beacon server binary — wires the tool registry into the dispatcher and
//! starts the HTTP/SSE server.

#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use beacon_rpc::RpcContext;
use beacon_server::config::ServerConfig;
use beacon_server::server::BeaconServer;
use beacon_tools::ToolRegistry;
use beacon_tools::arith::AddTool;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Beacon SSE push-RPC server.
#[derive(Parser, Debug)]
#[command(name = "beacond", about = "Beacon SSE push-RPC server")]
struct Cli {
    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind (0 for auto-assign).
    #[arg(long, default_value = "8931")]
    port: u16,

    /// Heartbeat period in seconds.
    #[arg(long, default_value = "10")]
    heartbeat_interval: u64,
}

/// Create a populated tool registry with built-in tools.
fn create_tool_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(AddTool));
    tracing::debug!(tool_count = registry.len(), tools = ?registry.names(), "tool registry created");
    registry
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let metrics_handle = beacon_server::metrics::install_recorder();

    let tools = Arc::new(create_tool_registry());
    let tool_count = tools.len();
    let ctx = RpcContext::new(tools);

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        heartbeat_interval_secs: args.heartbeat_interval,
        ..ServerConfig::default()
    };

    let server = BeaconServer::new(config, ctx, metrics_handle);
    let (addr, handle) = server.listen().await.context("Failed to bind server")?;

    tracing::info!("beacond listening on http://{addr} ({tool_count} tools registered)");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    server.shutdown().graceful_shutdown(vec![handle], None).await;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_default_host() {
        let cli = Cli::parse_from(["beacond"]);
        assert_eq!(cli.host, "127.0.0.1");
    }

    #[test]
    fn cli_default_port() {
        let cli = Cli::parse_from(["beacond"]);
        assert_eq!(cli.port, 8931);
    }

    #[test]
    fn cli_custom_port() {
        let cli = Cli::parse_from(["beacond", "--port", "8080"]);
        assert_eq!(cli.port, 8080);
    }

    #[test]
    fn cli_heartbeat_interval() {
        let cli = Cli::parse_from(["beacond", "--heartbeat-interval", "3"]);
        assert_eq!(cli.heartbeat_interval, 3);
    }

    #[test]
    fn tool_registry_has_add() {
        let registry = create_tool_registry();
        assert!(registry.contains("add"));
        assert_eq!(registry.len(), 1);
    }
}
