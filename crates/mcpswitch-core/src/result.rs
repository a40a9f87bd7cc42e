//! Probe result types.

use serde::{Deserialize, Serialize};

/// One tool advertised by a server in its `tools/list` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    /// Human-readable description; empty when the server supplies none.
    #[serde(default)]
    pub description: String,
}

/// Outcome of one connectivity probe for one server.
///
/// A result is created as `Testing` the instant a probe is scheduled and
/// transitions exactly once to `Success` or `Error`. The serialized shape
/// (`status` tag, `toolCount`/`tools`/`error` payload keys) is what the
/// presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeResult {
    /// Probe scheduled or in flight.
    Testing,
    /// Handshake completed; the server answered `tools/list`.
    Success {
        #[serde(rename = "toolCount")]
        tool_count: usize,
        tools: Vec<ToolSummary>,
    },
    /// Probe failed; `message` is the human-readable diagnostic.
    Error {
        #[serde(rename = "error")]
        message: String,
    },
}

impl ProbeResult {
    /// Build a `Success` from a tool list.
    #[must_use]
    pub fn success(tools: Vec<ToolSummary>) -> Self {
        Self::Success {
            tool_count: tools.len(),
            tools,
        }
    }

    /// Build an `Error` from any displayable diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether the probe has reached a terminal outcome.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }
}
