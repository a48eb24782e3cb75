//! Tool result envelope models.
//!
//! Every tool call, successful or not, produces a [`ToolEnvelope`]: a list of
//! typed content blocks. Failures are encoded as an [`ErrorReport`] rendered into a
//! text block rather than surfaced as a protocol error.

use crate::error::{GatewayError, GatewayResult};
use chrono::{SecondsFormat, Utc};
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Current time as an RFC 3339 UTC string with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A single typed content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// The uniform value returned for every tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEnvelope {
    pub content: Vec<ContentBlock>,
}

/// JSON body of a failed invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Set only by tools whose reports carry a status, e.g. health_check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    /// Always true; callers inspect this field to detect failure
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: String,
}

impl From<&GatewayError> for ErrorReport {
    fn from(err: &GatewayError) -> Self {
        Self {
            status: None,
            error: true,
            message: err.to_string(),
            details: err.details().map(str::to_string),
            timestamp: timestamp(),
        }
    }
}

impl ToolEnvelope {
    /// Envelope holding a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Envelope holding a value rendered as pretty-printed JSON.
    pub fn json<T: Serialize>(value: &T) -> GatewayResult<Self> {
        serde_json::to_string_pretty(value)
            .map(Self::text)
            .map_err(|e| GatewayError::internal(format!("Failed to serialize result: {e}")))
    }

    /// Envelope describing a failed invocation.
    pub fn failure(err: &GatewayError) -> Self {
        Self::report(&ErrorReport::from(err))
    }

    /// Envelope holding a prepared error report.
    pub fn report(report: &ErrorReport) -> Self {
        // Only owned strings and a bool; serialization cannot fail here.
        let text = serde_json::to_string_pretty(report).unwrap_or_else(|_| {
            format!(r#"{{"error": true, "message": {:?}}}"#, report.message)
        });
        Self::text(text)
    }

    /// Text of the first content block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(ContentBlock::as_text)
    }
}

/// Envelopes always map to a successful tool result; failures live in the content.
impl From<ToolEnvelope> for CallToolResult {
    fn from(envelope: ToolEnvelope) -> Self {
        let content = envelope
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Content::text(text),
            })
            .collect();
        CallToolResult::success(content)
    }
}
