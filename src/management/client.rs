//! HTTP client for the Supabase Management API query endpoint.

use crate::config::Configuration;
use crate::error::{GatewayError, GatewayResult};
use crate::management::ManagementApi;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

/// Body of `POST /v1/projects/{ref}/database/query`.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    read_only: bool,
}

/// Management API client backed by `reqwest`.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ManagementClient {
    /// Create a client for the Management API rooted at `base_url`
    /// (e.g. `https://api.supabase.com`).
    pub fn new(base_url: &str) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GatewayError::internal(format!("Invalid Management API URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::internal(format!(
                "Management API URL '{base_url}' cannot be used as a base URL"
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| GatewayError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the database query endpoint for `project_ref`.
    ///
    /// The project reference is pushed as a path segment, so it is percent-encoded.
    pub fn query_url(&self, project_ref: &str) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::internal("Management API URL cannot be a base"))?
            .pop_if_empty()
            .extend(["v1", "projects", project_ref, "database", "query"]);
        Ok(url)
    }
}

impl ManagementApi for ManagementClient {
    async fn run_query(&self, query: &str, config: &Configuration) -> GatewayResult<JsonValue> {
        let url = self.query_url(&config.project_ref)?;
        debug!(
            project_ref = %config.project_ref,
            query_len = query.len(),
            "Sending Management API query"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.access_token)
            .json(&QueryRequest {
                query,
                read_only: true,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::remote_api(status.as_u16(), body));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "Management API responded");
        serde_json::from_str(&body).map_err(|e| GatewayError::decode(e.to_string()))
    }
}
