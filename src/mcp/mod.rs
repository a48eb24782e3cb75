//! MCP server integration module.
//!
//! This module connects the MCP protocol (via rmcp) to the tool dispatcher.

pub mod dispatcher;
pub mod service;

pub use dispatcher::ToolDispatcher;
pub use service::GatewayService;
