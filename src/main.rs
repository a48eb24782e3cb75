//! Supabase MCP Gateway - Main entry point.
//!
//! Serves read-only Supabase tools (list_tables, execute_sql, health_check,
//! server_info) to MCP clients over stdio or Streamable HTTP.

use std::sync::Arc;
use supabase_mcp_gateway::config::{Config, TransportMode};
use supabase_mcp_gateway::management::ManagementClient;
use supabase_mcp_gateway::mcp::ToolDispatcher;
use supabase_mcp_gateway::transport::{HttpTransport, StdioTransport, Transport};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so they never mix with stdio protocol traffic.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse_args();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting Supabase MCP Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Missing credentials are reported per tool call, not at startup
    if let Err(e) = config.credentials.validate() {
        warn!(error = %e, "Supabase credentials incomplete; tool calls will return errors");
    }

    let client = ManagementClient::new(&config.management_api_url)?;
    info!(url = %client.base_url(), "Using Supabase Management API");
    let dispatcher = Arc::new(ToolDispatcher::new(config.credentials.clone(), client));

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            StdioTransport::new(dispatcher).run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                dispatcher,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
