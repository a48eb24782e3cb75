//! Health and introspection tools.
//!
//! `health_check` and `server_info` both probe the Management API by listing the
//! tables of the default schema. An empty listing still counts as healthy; only a
//! failed probe is reported as unhealthy/disconnected.

use crate::config::{Configuration, CredentialPresence};
use crate::management::ManagementApi;
use crate::models::{TableListing, timestamp};
use crate::tools::registry::ToolKind;
use crate::tools::schema::{SchemaToolHandler, default_schemas};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

pub const SERVER_NAME: &str = "supabase-mcp-gateway";
pub const SUPPORTED_TRANSPORTS: [&str; 2] = ["stdio", "streamable-http"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub connected: bool,
    pub tables_detected: usize,
    pub detection_method: String,
    pub error_details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSummary {
    pub project_ref: String,
    pub url: String,
    pub read_only_mode: bool,
    pub has_all_required_vars: bool,
}

/// Output from the health_check tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: String,
    pub server: &'static str,
    pub version: &'static str,
    pub management_api_connection: ProbeReport,
    pub configuration: ConfigurationSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub status: ConnectionStatus,
    pub tables_detected: usize,
    pub project_ref: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesReport {
    pub transport: Vec<&'static str>,
    pub tools: Vec<&'static str>,
    pub read_only_mode: bool,
}

/// Output from the server_info tool. Credentials appear only as presence flags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfoReport {
    pub timestamp: String,
    pub server: &'static str,
    pub version: &'static str,
    pub connection: ConnectionReport,
    pub capabilities: CapabilitiesReport,
    pub environment: CredentialPresence,
}

impl From<&Result<TableListing, String>> for ProbeReport {
    fn from(probe: &Result<TableListing, String>) -> Self {
        match probe {
            Ok(listing) => Self {
                connected: true,
                tables_detected: listing.count(),
                detection_method: listing.method.to_string(),
                error_details: None,
            },
            Err(message) => Self {
                connected: false,
                tables_detected: 0,
                detection_method: "unknown".to_string(),
                error_details: Some(message.clone()),
            },
        }
    }
}

pub struct HealthToolHandler<A> {
    api: Arc<A>,
}

impl<A: ManagementApi> HealthToolHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Best-effort connectivity probe. Failures are logged and returned as text.
    async fn probe(&self, config: &Configuration) -> Result<TableListing, String> {
        SchemaToolHandler::new(self.api.clone())
            .list(&default_schemas(), config)
            .await
            .map_err(|err| {
                warn!(kind = err.kind(), error = %err, "Management API probe failed");
                err.to_string()
            })
    }

    /// Handle the health_check tool.
    pub async fn health_check(&self, config: &Configuration) -> HealthReport {
        let probe = ProbeReport::from(&self.probe(config).await);
        let status = if probe.connected {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        HealthReport {
            status,
            timestamp: timestamp(),
            server: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            management_api_connection: probe,
            configuration: ConfigurationSummary {
                project_ref: config.project_ref.clone(),
                url: config.project_url.clone(),
                read_only_mode: true,
                has_all_required_vars: true,
            },
        }
    }

    /// Handle the server_info tool.
    pub async fn server_info(
        &self,
        config: &Configuration,
        presence: CredentialPresence,
    ) -> ServerInfoReport {
        let probe = ProbeReport::from(&self.probe(config).await);
        let status = if probe.connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        };

        ServerInfoReport {
            timestamp: timestamp(),
            server: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            connection: ConnectionReport {
                status,
                tables_detected: probe.tables_detected,
                project_ref: config.project_ref.clone(),
                url: config.project_url.clone(),
            },
            capabilities: CapabilitiesReport {
                transport: SUPPORTED_TRANSPORTS.to_vec(),
                tools: ToolKind::names(),
                read_only_mode: true,
            },
            environment: presence,
        }
    }
}
