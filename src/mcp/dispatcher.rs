//! Tool dispatch.
//!
//! [`ToolDispatcher`] is the boundary where results become envelopes. Inside it
//! everything is a `GatewayResult`; out of it comes a [`ToolEnvelope`] in every case,
//! with failures rendered as an error report and logged here.

use crate::config::Credentials;
use crate::error::GatewayResult;
use crate::management::{ManagementApi, ManagementClient};
use crate::models::{ErrorReport, ToolEnvelope};
use crate::tools::health::HealthStatus;
use crate::tools::{HealthToolHandler, QueryToolHandler, SchemaToolHandler, ToolCall, ToolKind};
use rmcp::model::JsonObject;
use std::sync::Arc;
use tracing::{error, info};

pub struct ToolDispatcher<A = ManagementClient> {
    /// Credentials loaded at startup; validated on every call
    credentials: Credentials,
    api: Arc<A>,
}

impl<A: ManagementApi> ToolDispatcher<A> {
    pub fn new(credentials: Credentials, api: A) -> Self {
        Self {
            credentials,
            api: Arc::new(api),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run the named tool. Never fails: errors are returned inside the envelope.
    ///
    /// A failed `health_check` still reports `status: "unhealthy"`.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> ToolEnvelope {
        info!(tool = name, "Tool invoked");
        match self.try_dispatch(name, arguments).await {
            Ok(envelope) => envelope,
            Err(err) => {
                error!(tool = name, kind = err.kind(), error = %err, "Tool invocation failed");
                let mut report = ErrorReport::from(&err);
                if ToolKind::from_name(name) == Some(ToolKind::HealthCheck) {
                    report.status = Some(HealthStatus::Unhealthy.as_str());
                }
                ToolEnvelope::report(&report)
            }
        }
    }

    async fn try_dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> GatewayResult<ToolEnvelope> {
        let config = self.credentials.validate()?;
        let call = ToolCall::parse(name, arguments)?;

        match call {
            ToolCall::ListTables(input) => {
                let output = SchemaToolHandler::new(self.api.clone())
                    .list_tables(input, &config)
                    .await?;
                ToolEnvelope::json(&output)
            }
            ToolCall::ExecuteSql(input) => {
                let text = QueryToolHandler::new(self.api.clone())
                    .execute_sql(input, &config)
                    .await?;
                Ok(ToolEnvelope::text(text))
            }
            ToolCall::HealthCheck => {
                let report = HealthToolHandler::new(self.api.clone())
                    .health_check(&config)
                    .await;
                ToolEnvelope::json(&report)
            }
            ToolCall::ServerInfo => {
                let report = HealthToolHandler::new(self.api.clone())
                    .server_info(&config, self.credentials.presence())
                    .await;
                ToolEnvelope::json(&report)
            }
        }
    }
}

