//! Supabase Management API access.
//!
//! All SQL reaches the database through the Management API's query endpoint,
//! never through a direct connection. The [`ManagementApi`] trait is the seam the
//! tool layer depends on; [`ManagementClient`] is the HTTP implementation.

pub mod client;

pub use client::ManagementClient;

use crate::config::Configuration;
use crate::error::GatewayResult;
use serde_json::Value as JsonValue;
use std::future::Future;

/// Executes SQL against a project through the Management API.
pub trait ManagementApi: Send + Sync {
    /// Run `query` in read-only mode and return the parsed JSON response.
    ///
    /// Implementations issue exactly one remote call and never retry.
    fn run_query(
        &self,
        query: &str,
        config: &Configuration,
    ) -> impl Future<Output = GatewayResult<JsonValue>> + Send;
}
