//! Byte-stream framing for both transports.
//!
//! stdio frames are newline-delimited JSON values; HTTP frames are either a
//! plain JSON body or a `text/event-stream` body whose last `data:` line
//! carries the payload.

use crate::jsonrpc::JsonRpcMessage;

/// Newline-delimited JSON decoder for child stdout.
///
/// Accumulates chunks, splits off complete lines, and parses each non-empty
/// line as one JSON value. Lines that do not parse are skipped (startup
/// banners from `npx` and friends); a trailing partial line is retained
/// until more output arrives.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: String,
}

impl LineDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk of output and return the messages it completed.
    pub fn push(&mut self, chunk: &str) -> Vec<JsonRpcMessage> {
        self.buf.push_str(chunk);

        let mut messages = Vec::new();
        while let Some(pos) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=pos).collect();
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match JsonRpcMessage::parse(trimmed) {
                Some(msg) => messages.push(msg),
                None => {
                    tracing::debug!(line = trimmed, "Skipping non-JSON-RPC output");
                }
            }
        }
        messages
    }
}

/// Decode one HTTP response body into a message, selected by content type.
///
/// Returns `None` when no payload can be extracted; the caller turns that
/// into a malformed-response error carrying a body snippet.
#[must_use]
pub fn decode_http_body(content_type: Option<&str>, body: &str) -> Option<JsonRpcMessage> {
    if content_type.is_some_and(|ct| ct.contains("text/event-stream")) {
        // SSE: the last data: line carries the JSON-RPC payload
        for line in body.lines().rev() {
            let trimmed = line.trim();
            if let Some(data) = trimmed.strip_prefix("data:") {
                let data = data.trim();
                if data.is_empty() {
                    continue;
                }
                if let Some(msg) = JsonRpcMessage::parse(data) {
                    return Some(msg);
                }
            }
        }
        return None;
    }

    JsonRpcMessage::parse(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_yields_complete_lines() {
        let mut decoder = LineDecoder::new();
        let messages = decoder.push("{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, Some(1));
    }

    #[test]
    fn decoder_holds_partial_line_across_chunks() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.push("{\"jsonrpc\":\"2.0\",\"id\":1,").is_empty());
        assert!(decoder.push("\"result\":{}}").is_empty());
        let messages = decoder.push("\n{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{}}\n");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, Some(1));
        assert_eq!(messages[1].id, Some(2));
    }

    #[test]
    fn decoder_skips_blank_and_junk_lines() {
        let mut decoder = LineDecoder::new();
        let messages = decoder.push(
            "\nnpm warn deprecated something\n{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n\n",
        );
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn decoder_handles_many_messages_in_one_chunk() {
        let mut decoder = LineDecoder::new();
        let messages = decoder.push(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"tools\":[]}}\n",
        );
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn sse_body_uses_last_data_line() {
        let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":7,\"result\":{}}\n\n";
        let msg = decode_http_body(Some("text/event-stream"), body).unwrap();
        assert_eq!(msg.id, Some(7));
    }

    #[test]
    fn sse_and_plain_json_decode_identically() {
        let payload = r#"{"jsonrpc":"2.0","id":1,"result":{}}"#;
        let sse = format!("data: {payload}\n\n");

        let from_sse = decode_http_body(Some("text/event-stream"), &sse).unwrap();
        let from_json = decode_http_body(Some("application/json"), payload).unwrap();
        assert_eq!(from_sse.id, from_json.id);
        assert_eq!(from_sse.has_result(), from_json.has_result());
    }

    #[test]
    fn sse_scans_backward_past_unparsable_tail() {
        let body = "data: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\ndata: not json\n";
        let msg = decode_http_body(Some("text/event-stream; charset=utf-8"), body).unwrap();
        assert_eq!(msg.id, Some(1));
    }

    #[test]
    fn missing_payload_returns_none() {
        assert!(decode_http_body(Some("text/event-stream"), "event: ping\n\n").is_none());
        assert!(decode_http_body(Some("application/json"), "<html>oops</html>").is_none());
        assert!(decode_http_body(None, "").is_none());
    }
}
