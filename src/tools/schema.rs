//! Table listing tool.
//!
//! This module implements the `list_tables` MCP tool: it builds a read-only
//! catalog query for the requested schemas and runs it through the Management API.

use crate::config::Configuration;
use crate::error::{GatewayError, GatewayResult};
use crate::management::ManagementApi;
use crate::models::{TableListing, timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::info;

/// Schema listed when the caller does not name any.
pub const DEFAULT_SCHEMA: &str = "public";

/// Schemas excluded when the caller asks for every schema (empty filter).
pub const SYSTEM_SCHEMAS: [&str; 4] = [
    "information_schema",
    "pg_catalog",
    "pg_toast",
    "_timescaledb_internal",
];

pub fn default_schemas() -> Vec<String> {
    vec![DEFAULT_SCHEMA.to_string()]
}

/// Input for the list_tables tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// Schemas to include. Default: ["public"]. An empty list includes every schema except system schemas.
    #[serde(default = "default_schemas")]
    pub schemas: Vec<String>,
}

impl Default for ListTablesInput {
    fn default() -> Self {
        Self {
            schemas: default_schemas(),
        }
    }
}

impl ListTablesInput {
    pub fn validate(&self) -> GatewayResult<()> {
        if let Some(pos) = self.schemas.iter().position(|s| s.trim().is_empty()) {
            return Err(GatewayError::validation(format!(
                "schemas[{pos}] must be a non-empty schema name"
            )));
        }
        Ok(())
    }
}

/// Output from the list_tables tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTablesOutput {
    pub project_ref: String,
    pub url: String,
    pub schemas_requested: Vec<String>,
    pub tables_count: usize,
    /// Table names sorted lexicographically
    pub tables: Vec<String>,
    pub detection_method: &'static str,
    pub success: bool,
    pub note: String,
    pub mode: &'static str,
    pub timestamp: String,
    /// Raw catalog rows (schema, name, id, comment)
    pub full_table_data: Vec<Map<String, JsonValue>>,
}

/// Quote `value` as a SQL string literal, doubling embedded single quotes.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn literal_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(quote_literal)
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the catalog query listing ordinary tables.
///
/// A non-empty `schemas` restricts the result to exactly those schemas, in the
/// given order. An empty slice lists every schema except [`SYSTEM_SCHEMAS`].
/// The output is deterministic for a given input.
pub fn list_tables_query(schemas: &[String]) -> String {
    let filter = if schemas.is_empty() {
        format!(
            "nc.nspname NOT IN ({})",
            literal_list(SYSTEM_SCHEMAS.iter().copied())
        )
    } else {
        format!(
            "nc.nspname IN ({})",
            literal_list(schemas.iter().map(String::as_str))
        )
    };

    format!(
        "SELECT DISTINCT\n  \
           nc.nspname AS schema,\n  \
           c.relname AS name,\n  \
           c.oid::int8 AS id,\n  \
           obj_description(c.oid) AS comment\n\
         FROM pg_namespace nc\n  \
           JOIN pg_class c ON nc.oid = c.relnamespace\n\
         WHERE c.relkind = 'r'\n  \
           AND {filter}\n\
         ORDER BY nc.nspname, c.relname"
    )
}

pub struct SchemaToolHandler<A> {
    api: Arc<A>,
}

impl<A: ManagementApi> SchemaToolHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Run the listing query for `schemas` and collect the table names.
    pub async fn list(
        &self,
        schemas: &[String],
        config: &Configuration,
    ) -> GatewayResult<TableListing> {
        let sql = list_tables_query(schemas);
        let response = self.api.run_query(&sql, config).await?;

        let rows: Vec<Map<String, JsonValue>> = serde_json::from_value(response)
            .map_err(|e| GatewayError::decode(format!("expected an array of row objects: {e}")))?;
        let listing = TableListing::from_rows(rows)?;

        info!(
            schemas = ?schemas,
            count = listing.count(),
            "Listed tables"
        );
        Ok(listing)
    }

    /// Handle the list_tables tool.
    pub async fn list_tables(
        &self,
        input: ListTablesInput,
        config: &Configuration,
    ) -> GatewayResult<ListTablesOutput> {
        input.validate()?;
        let listing = self.list(&input.schemas, config).await?;

        Ok(ListTablesOutput {
            project_ref: config.project_ref.clone(),
            url: config.project_url.clone(),
            schemas_requested: input.schemas,
            tables_count: listing.count(),
            tables: listing.tables,
            detection_method: listing.method,
            success: listing.success,
            note: listing.note,
            mode: "read-only",
            timestamp: timestamp(),
            full_table_data: listing.full_data,
        })
    }
}
