//! Error types for the Supabase MCP gateway.
//!
//! Every failure a tool can hit is a `GatewayError` variant. The dispatcher is the
//! only place these are turned into wire-level content, so each variant carries a
//! message suitable for an AI assistant and an operator-facing hint via [`GatewayError::details`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Missing required environment variables: {}", missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    #[error("Invalid arguments: {message}")]
    Validation { message: String },

    #[error("Unsupported tool: {name}")]
    UnsupportedTool { name: String },

    #[error("Management API error: {status} - {body}")]
    RemoteApi { status: u16, body: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Failed to decode Management API response: {message}")]
    Decode { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    /// Create a configuration error listing every missing variable.
    pub fn configuration(missing: Vec<&'static str>) -> Self {
        Self::Configuration { missing }
    }

    /// Create an argument validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an unsupported tool error.
    pub fn unsupported_tool(name: impl Into<String>) -> Self {
        Self::UnsupportedTool { name: name.into() }
    }

    /// Create a remote API error from a non-success HTTP response.
    pub fn remote_api(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteApi {
            status,
            body: body.into(),
        }
    }

    /// Create a transport (network-level) error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the error kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Validation { .. } => "validation",
            Self::UnsupportedTool { .. } => "unsupported_tool",
            Self::RemoteApi { .. } => "remote_api",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
            Self::Internal { .. } => "internal",
        }
    }

    /// Hint describing what to check, surfaced as the envelope `details` field.
    pub fn details(&self) -> Option<&'static str> {
        match self {
            Self::Configuration { .. } => Some(
                "Set SUPABASE_ACCESS_TOKEN, SUPABASE_PROJECT_REF, SUPABASE_URL and SUPABASE_ANON_KEY in the server environment",
            ),
            Self::Validation { .. } => {
                Some("Check the tool arguments against the input schema from tools/list")
            }
            Self::UnsupportedTool { .. } => {
                Some("Call tools/list to see the tools this server provides")
            }
            Self::RemoteApi { .. } => Some(
                "Check SUPABASE_ACCESS_TOKEN and SUPABASE_PROJECT_REF, and the SQL syntax and permissions",
            ),
            Self::Transport { .. } => {
                Some("Check network connectivity to the Supabase Management API")
            }
            Self::Decode { .. } => None,
            Self::Internal { .. } => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::decode(err.to_string())
        } else {
            GatewayError::transport(err.to_string())
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
