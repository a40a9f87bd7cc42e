//! JSON-RPC 2.0 message model for the MCP handshake.
//!
//! Reference: <https://spec.modelcontextprotocol.io/>

use serde::Deserialize;
use serde_json::{Value, json};

/// The one protocol version this prober speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Request id used for `initialize`.
pub const INIT_ID: i64 = 1;
/// Request id used for `tools/list`.
pub const TOOLS_ID: i64 = 2;

/// One inbound JSON-RPC message, deserialized leniently.
///
/// Transient: exists only for the duration of a handshake exchange. Any of
/// the fields may be absent; the handshake decides what a message means.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcMessage {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl JsonRpcMessage {
    /// Parse one frame; `None` when the text is not a complete JSON object.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Whether the message carries a non-empty (present, non-null) result.
    #[must_use]
    pub fn has_result(&self) -> bool {
        self.result.as_ref().is_some_and(|r| !r.is_null())
    }

    /// Extract the error message when the top-level `error` field is
    /// populated: the error's `message` if it has one, otherwise the
    /// serialized error value.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| error.to_string(), str::to_string)
        })
    }
}

/// Build the `initialize` request (id 1).
#[must_use]
pub fn initialize_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": INIT_ID,
        "method": "initialize",
        "params": {
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }
        }
    })
}

/// Build the `notifications/initialized` notification (no id, no response).
#[must_use]
pub fn initialized_notification() -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    })
}

/// Build the `tools/list` request (id 2).
#[must_use]
pub fn tools_list_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": TOOLS_ID,
        "method": "tools/list",
        "params": {}
    })
}
