//! The MCP handshake state machine.
//!
//! Transport-agnostic: it consumes inbound [`JsonRpcMessage`]s and produces
//! outbound payloads, leaving all I/O to the caller. Both transports drive
//! the same machine behind different framing.

use crate::jsonrpc::{
    INIT_ID, JsonRpcMessage, TOOLS_ID, initialize_request, initialized_notification,
    tools_list_request,
};
use mcpswitch_core::ToolSummary;
use serde_json::Value;

/// An outbound payload the transport must deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A request the peer is expected to answer.
    Request(Value),
    /// A best-effort notification; delivery failure must not fail the probe.
    Notification(Value),
}

/// Terminal outcome of a handshake.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server answered `tools/list`.
    Success(Vec<ToolSummary>),
    /// The server reported a protocol-level error.
    Error(String),
}

#[derive(Debug)]
enum State {
    AwaitInitResult,
    AwaitToolsResult,
    Done(Outcome),
}

/// Drives `initialize` → `notifications/initialized` + `tools/list`.
///
/// Once `Done` is reached every further message is a no-op, which makes
/// duplicate redelivery of already-handled ids idempotent and guarantees a
/// single terminal outcome per handshake.
#[derive(Debug)]
pub struct Handshake {
    state: State,
}

impl Handshake {
    /// Begin a handshake, returning the machine and the `initialize`
    /// request the transport must send first.
    #[must_use]
    pub fn start() -> (Self, Value) {
        (
            Self {
                state: State::AwaitInitResult,
            },
            initialize_request(),
        )
    }

    /// Feed one inbound message; returns payloads to send in order.
    ///
    /// A top-level `error` settles the machine from any state, checked
    /// before the id-specific transitions since a server may report a
    /// protocol-level error instead of a keyed result.
    pub fn on_message(&mut self, msg: &JsonRpcMessage) -> Vec<Outbound> {
        if self.is_settled() {
            return Vec::new();
        }

        if let Some(message) = msg.error_message() {
            self.state = State::Done(Outcome::Error(message));
            return Vec::new();
        }

        if matches!(self.state, State::AwaitInitResult)
            && msg.id == Some(INIT_ID)
            && msg.has_result()
        {
            self.state = State::AwaitToolsResult;
            return vec![
                Outbound::Notification(initialized_notification()),
                Outbound::Request(tools_list_request()),
            ];
        }

        if matches!(self.state, State::AwaitToolsResult)
            && msg.id == Some(TOOLS_ID)
            && msg.has_result()
        {
            let tools = msg.result.as_ref().map(extract_tools).unwrap_or_default();
            self.state = State::Done(Outcome::Success(tools));
        }

        Vec::new()
    }

    /// Whether a terminal outcome has been reached.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self.state, State::Done(_))
    }

    /// The terminal outcome, once settled.
    #[must_use]
    pub const fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            State::Done(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Map `result.tools` (absent → empty) to tool summaries; a missing
/// description becomes an empty string.
fn extract_tools(result: &Value) -> Vec<ToolSummary> {
    result
        .get("tools")
        .and_then(Value::as_array)
        .map(|tools| {
            tools
                .iter()
                .filter_map(|tool| {
                    let name = tool.get("name").and_then(Value::as_str)?;
                    Some(ToolSummary {
                        name: name.to_string(),
                        description: tool
                            .get("description")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> JsonRpcMessage {
        JsonRpcMessage::parse(text).unwrap()
    }

    #[test]
    fn full_handshake_reaches_success() {
        let (mut hs, init) = Handshake::start();
        assert_eq!(init["method"], "initialize");

        let outbound = hs.on_message(&msg(
            r#"{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05"}}"#,
        ));
        assert_eq!(outbound.len(), 2);
        assert!(matches!(&outbound[0], Outbound::Notification(v) if v["method"] == "notifications/initialized"));
        assert!(matches!(&outbound[1], Outbound::Request(v) if v["method"] == "tools/list"));
        assert!(!hs.is_settled());

        let outbound = hs.on_message(&msg(
            r#"{"jsonrpc":"2.0","id":2,"result":{"tools":[{"name":"get_weather","description":"Weather lookup"},{"name":"bare_tool"}]}}"#,
        ));
        assert!(outbound.is_empty());

        let Some(Outcome::Success(tools)) = hs.outcome() else {
            panic!("expected success");
        };
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "get_weather");
        assert_eq!(tools[0].description, "Weather lookup");
        assert_eq!(tools[1].description, "");
    }

    #[test]
    fn empty_tools_list_is_success_not_error() {
        let (mut hs, _) = Handshake::start();
        hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
        hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":2,"result":{"tools":[]}}"#));
        assert_eq!(hs.outcome(), Some(&Outcome::Success(Vec::new())));
    }

    #[test]
    fn absent_tools_key_is_treated_as_empty() {
        let (mut hs, _) = Handshake::start();
        hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
        hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":2,"result":{}}"#));
        assert_eq!(hs.outcome(), Some(&Outcome::Success(Vec::new())));
    }

    #[test]
    fn error_settles_before_id_checks() {
        let (mut hs, _) = Handshake::start();
        // Error arrives with the init id and even a result; error wins
        let outbound = hs.on_message(&msg(
            r#"{"jsonrpc":"2.0","id":1,"result":{},"error":{"code":-32000,"message":"nope"}}"#,
        ));
        assert!(outbound.is_empty());
        assert_eq!(hs.outcome(), Some(&Outcome::Error("nope".to_string())));
    }

    #[test]
    fn error_in_await_tools_state_settles_error() {
        let (mut hs, _) = Handshake::start();
        hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
        hs.on_message(&msg(
            r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32601,"message":"Method not found"}}"#,
        ));
        assert_eq!(
            hs.outcome(),
            Some(&Outcome::Error("Method not found".to_string()))
        );
    }

    #[test]
    fn messages_after_settle_are_ignored() {
        let (mut hs, _) = Handshake::start();
        hs.on_message(&msg(r#"{"jsonrpc":"2.0","error":{"message":"boom"}}"#));
        assert!(hs.is_settled());

        // A late, otherwise-valid exchange must not resurrect the machine
        let outbound = hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
        assert!(outbound.is_empty());
        let outbound = hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":2,"result":{"tools":[]}}"#));
        assert!(outbound.is_empty());
        assert_eq!(hs.outcome(), Some(&Outcome::Error("boom".to_string())));
    }

    #[test]
    fn duplicate_init_result_does_not_resend_requests() {
        let (mut hs, _) = Handshake::start();
        let first = hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
        assert_eq!(first.len(), 2);
        let second = hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
        assert!(second.is_empty());
    }

    #[test]
    fn unrelated_messages_are_ignored() {
        let (mut hs, _) = Handshake::start();
        // Server-initiated notification and a mismatched id
        let outbound = hs.on_message(&msg(
            r#"{"jsonrpc":"2.0","method":"notifications/progress","params":{}}"#,
        ));
        assert!(outbound.is_empty());
        let outbound = hs.on_message(&msg(r#"{"jsonrpc":"2.0","id":2,"result":{}}"#));
        assert!(outbound.is_empty());
        assert!(!hs.is_settled());
    }
}
