//! SQL execution tool.
//!
//! This module implements the `execute_sql` MCP tool. Statements always run with
//! the Management API's read-only flag; the raw result is returned wrapped in
//! untrusted-data boundaries (see [`crate::tools::format`]).

use crate::config::Configuration;
use crate::error::{GatewayError, GatewayResult};
use crate::management::ManagementApi;
use crate::tools::format::wrap_untrusted;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Input for the execute_sql tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteSqlInput {
    /// The SQL query to execute. Runs in read-only mode.
    pub query: String,
}

impl ExecuteSqlInput {
    pub fn validate(&self) -> GatewayResult<()> {
        if self.query.trim().is_empty() {
            return Err(GatewayError::validation("query must not be empty"));
        }
        Ok(())
    }
}

pub struct QueryToolHandler<A> {
    api: Arc<A>,
}

impl<A: ManagementApi> QueryToolHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Handle the execute_sql tool, returning the wrapped result text.
    pub async fn execute_sql(
        &self,
        input: ExecuteSqlInput,
        config: &Configuration,
    ) -> GatewayResult<String> {
        input.validate()?;
        info!(query_len = input.query.len(), "Executing SQL");

        let result = self.api.run_query(&input.query, config).await?;
        wrap_untrusted(&result)
    }
}
