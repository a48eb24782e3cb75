//! Configuration handling for the Supabase MCP gateway.
//!
//! Server options come from CLI arguments with environment variable fallbacks.
//! The four Supabase credentials are loaded once at startup into [`Credentials`]
//! and validated into a [`Configuration`] on every tool invocation, so a server
//! started without them still answers `tools/list` and reports what is missing.

use crate::error::{GatewayError, GatewayResult};
use clap::{Args, Parser, ValueEnum};
use serde::Serialize;
use std::fmt;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/mcp";
pub const DEFAULT_MANAGEMENT_API_URL: &str = "https://api.supabase.com";

pub const ENV_ACCESS_TOKEN: &str = "SUPABASE_ACCESS_TOKEN";
pub const ENV_PROJECT_REF: &str = "SUPABASE_PROJECT_REF";
pub const ENV_PROJECT_URL: &str = "SUPABASE_URL";
pub const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP with Server-Sent Events (for web clients)
    Http,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Raw Supabase credentials as read from the environment.
///
/// Any field may be absent; use [`Credentials::validate`] to obtain a usable
/// [`Configuration`].
#[derive(Clone, Default, Args)]
pub struct Credentials {
    /// Supabase personal access token for the Management API
    #[arg(long, env = ENV_ACCESS_TOKEN, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Supabase project reference
    #[arg(long, env = ENV_PROJECT_REF)]
    pub project_ref: Option<String>,

    /// Supabase project URL
    #[arg(long = "project-url", env = ENV_PROJECT_URL)]
    pub project_url: Option<String>,

    /// Supabase anonymous API key
    #[arg(long, env = ENV_ANON_KEY, hide_env_values = true)]
    pub anon_key: Option<String>,
}

/// Which credentials are present, without their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPresence {
    pub has_access_token: bool,
    pub has_project_ref: bool,
    pub has_url: bool,
    pub has_anon_key: bool,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Credentials {
    /// Build credentials from explicit values (useful for testing).
    pub fn new(
        access_token: impl Into<String>,
        project_ref: impl Into<String>,
        project_url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            project_ref: Some(project_ref.into()),
            project_url: Some(project_url.into()),
            anon_key: Some(anon_key.into()),
        }
    }

    /// Validate that every credential is present and non-empty.
    ///
    /// The error names all missing variables at once, in declaration order.
    pub fn validate(&self) -> GatewayResult<Configuration> {
        let fields = [
            (ENV_ACCESS_TOKEN, present(&self.access_token)),
            (ENV_PROJECT_REF, present(&self.project_ref)),
            (ENV_PROJECT_URL, present(&self.project_url)),
            (ENV_ANON_KEY, present(&self.anon_key)),
        ];

        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(GatewayError::configuration(missing));
        }

        let value = |v: Option<&str>| v.unwrap_or_default().to_string();
        Ok(Configuration {
            access_token: value(fields[0].1),
            project_ref: value(fields[1].1),
            project_url: value(fields[2].1),
            anon_key: value(fields[3].1),
        })
    }

    pub fn presence(&self) -> CredentialPresence {
        CredentialPresence {
            has_access_token: present(&self.access_token).is_some(),
            has_project_ref: present(&self.project_ref).is_some(),
            has_url: present(&self.project_url).is_some(),
            has_anon_key: present(&self.anon_key).is_some(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("presence", &self.presence())
            .field("project_ref", &self.project_ref)
            .finish()
    }
}

/// Validated, immutable Supabase configuration for a single invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    pub access_token: String,
    pub project_ref: String,
    pub project_url: String,
    pub anon_key: String,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("access_token", &"<redacted>")
            .field("project_ref", &self.project_ref)
            .field("project_url", &self.project_url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "supabase-mcp-gateway",
    about = "MCP gateway exposing read-only Supabase Management API tools to AI assistants",
    version,
    author
)]
pub struct Config {
    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Base URL of the Supabase Management API
    #[arg(
        long,
        default_value = DEFAULT_MANAGEMENT_API_URL,
        env = "SUPABASE_MANAGEMENT_API_URL"
    )]
    pub management_api_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    #[command(flatten)]
    pub credentials: Credentials,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            management_api_url: DEFAULT_MANAGEMENT_API_URL.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            credentials: Credentials::default(),
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
