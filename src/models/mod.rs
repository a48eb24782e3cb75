//! Data models for the Supabase MCP gateway.
//!
//! This module re-exports all model types used throughout the application.

pub mod envelope;
pub mod listing;

// Re-export commonly used types
pub use envelope::{ContentBlock, ErrorReport, ToolEnvelope, timestamp};
pub use listing::{LISTING_METHOD, TableListing};
