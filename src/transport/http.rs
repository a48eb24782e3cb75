//! Streamable HTTP transport.
//!
//! The rmcp `StreamableHttpService` is mounted on an axum router at the configured
//! endpoint. Each MCP session gets its own `GatewayService` over the shared
//! dispatcher; session state lives in memory.

use crate::error::{GatewayError, GatewayResult};
use crate::mcp::{GatewayService, ToolDispatcher};
use crate::transport::{Transport, wait_for_signal};
use axum::Router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// Upper bound on waiting for open SSE streams after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpTransport {
    dispatcher: Arc<ToolDispatcher>,
    host: String,
    port: u16,
    /// Path the MCP service is mounted at, e.g. `/mcp`
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        dispatcher: Arc<ToolDispatcher>,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Router serving the MCP endpoint. Other paths return 404.
    pub fn router(&self) -> Router {
        let dispatcher = self.dispatcher.clone();
        let mcp = StreamableHttpService::new(
            move || Ok(GatewayService::new(dispatcher.clone())),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service rejects "/"
        match self.endpoint.as_str() {
            "/" => Router::new().fallback_service(mcp),
            path => Router::new().nest_service(path, mcp),
        }
    }
}

/// Resolve once the first shutdown signal has been seen and then either the drain
/// timeout elapses or a second signal arrives.
async fn forced_exit(first_signal: Arc<Notify>) {
    first_signal.notified().await;
    info!(
        timeout_secs = DRAIN_TIMEOUT.as_secs(),
        "Draining open connections; signal again to exit immediately"
    );
    tokio::select! {
        _ = tokio::time::sleep(DRAIN_TIMEOUT) => warn!("Drain timeout reached, exiting"),
        _ = wait_for_signal() => warn!("Second signal received, exiting"),
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> GatewayResult<()> {
        let bind_addr = self.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            GatewayError::internal(format!("Failed to bind HTTP listener on {bind_addr}: {e}"))
        })?;
        info!(addr = %bind_addr, endpoint = %self.endpoint, "MCP HTTP endpoint listening");

        let first_signal = Arc::new(Notify::new());
        let notify = first_signal.clone();
        let server = axum::serve(listener, self.router()).with_graceful_shutdown(async move {
            wait_for_signal().await;
            notify.notify_one();
        });

        tokio::select! {
            result = server => {
                if let Err(e) = result {
                    error!(error = %e, "HTTP server failed");
                    return Err(GatewayError::internal(format!("HTTP server failed: {e}")));
                }
                info!("HTTP server stopped");
            }
            _ = forced_exit(first_signal) => {}
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::management::ManagementClient;

    fn transport(host: &str, port: u16, endpoint: &str) -> HttpTransport {
        let client = ManagementClient::new("https://api.supabase.com").unwrap();
        let dispatcher = Arc::new(ToolDispatcher::new(Credentials::default(), client));
        HttpTransport::new(dispatcher, host, port, endpoint)
    }

    #[test]
    fn test_bind_addr_and_endpoint() {
        let transport = transport("0.0.0.0", 3000, "/api/mcp");
        assert_eq!(transport.name(), "http");
        assert_eq!(transport.bind_addr(), "0.0.0.0:3000");
        assert_eq!(transport.endpoint(), "/api/mcp");
    }

    #[test]
    fn test_root_endpoint_builds_router() {
        let transport = transport("127.0.0.1", 8080, "/");
        let _router = transport.router();
    }

    #[tokio::test]
    async fn test_other_paths_not_found() {
        let transport = transport("127.0.0.1", 0, "/mcp");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = transport.router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let response = reqwest::get(format!("http://{addr}/elsewhere")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
