//! MCP tool implementations.
//!
//! This module contains all tool handlers:
//! - `list_tables`: List tables in the requested schemas
//! - `execute_sql`: Run read-only SQL, result wrapped as untrusted data
//! - `health_check` / `server_info`: Connectivity probe and server introspection
//! - `registry`: The closed set of tools and their argument parsing
//! - `format`: Untrusted-data boundaries for raw query results

pub mod format;
pub mod health;
pub mod query;
pub mod registry;
pub mod schema;

pub use health::{HealthReport, HealthToolHandler, ServerInfoReport};
pub use query::{ExecuteSqlInput, QueryToolHandler};
pub use registry::{ToolCall, ToolKind, tool_definitions};
pub use schema::{ListTablesInput, ListTablesOutput, SchemaToolHandler, list_tables_query};
