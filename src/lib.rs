//! Supabase MCP Gateway Library
//!
//! This library exposes a small set of read-only MCP (Model Context Protocol) tools
//! for a Supabase project. Every tool call is forwarded to the Supabase Management
//! API and the response is reshaped into text content for an AI assistant.

pub mod config;
pub mod error;
pub mod management;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::{Config, Configuration, Credentials};
pub use error::{GatewayError, GatewayResult};
pub use management::{ManagementApi, ManagementClient};
pub use mcp::{GatewayService, ToolDispatcher};
