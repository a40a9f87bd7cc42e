//! HTTP transport: one POST per JSON-RPC request against the descriptor URL.

use crate::error::{ProbeError, snippet};
use crate::frame::decode_http_body;
use crate::handshake::{Handshake, Outbound, Outcome};
use crate::jsonrpc::JsonRpcMessage;
use mcpswitch_core::{ServerDescriptor, ToolSummary};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// How much of an undecodable body is echoed back in the error.
const BODY_SNIPPET_CHARS: usize = 300;

/// Run the full HTTP probe under one hard deadline covering both
/// round-trips.
pub(crate) async fn probe_http(
    client: &reqwest::Client,
    descriptor: &ServerDescriptor,
    deadline: Duration,
) -> Result<Vec<ToolSummary>, ProbeError> {
    let url = descriptor.url.as_deref().ok_or(ProbeError::NoUrl)?;

    match tokio::time::timeout(
        deadline,
        run_handshake(client, url, &descriptor.headers, deadline),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(ProbeError::HttpTimeout {
            seconds: deadline.as_secs(),
        }),
    }
}

async fn run_handshake(
    client: &reqwest::Client,
    url: &str,
    extra_headers: &BTreeMap<String, String>,
    per_request: Duration,
) -> Result<Vec<ToolSummary>, ProbeError> {
    let headers = build_headers(extra_headers)?;

    let (mut handshake, init) = Handshake::start();
    let (msg, body) = post_and_decode(client, url, &headers, &init, "initialize", per_request).await?;

    let outbound = handshake.on_message(&msg);
    check_settled_error(&handshake)?;
    if outbound.is_empty() && !handshake.is_settled() {
        // Parsed, but not the keyed result we asked for
        return Err(ProbeError::MalformedResponse {
            phase: "initialize",
            snippet: snippet(&body, BODY_SNIPPET_CHARS),
        });
    }

    for message in outbound {
        match message {
            Outbound::Notification(payload) => {
                // Fire and forget; some servers need it, but its failure
                // must never fail the probe
                let request = client
                    .post(url)
                    .headers(headers.clone())
                    .json(&payload)
                    .timeout(per_request);
                tokio::spawn(async move {
                    if let Err(e) = request.send().await {
                        tracing::debug!(error = %e, "initialized notification not delivered");
                    }
                });
            }
            Outbound::Request(payload) => {
                let (msg, body) =
                    post_and_decode(client, url, &headers, &payload, "tools/list", per_request)
                        .await?;
                handshake.on_message(&msg);
                check_settled_error(&handshake)?;
                if !handshake.is_settled() {
                    return Err(ProbeError::MalformedResponse {
                        phase: "tools/list",
                        snippet: snippet(&body, BODY_SNIPPET_CHARS),
                    });
                }
            }
        }
    }

    match handshake.outcome() {
        Some(Outcome::Success(tools)) => Ok(tools.clone()),
        // Settled errors were surfaced above; an unsettled machine means
        // the init response matched but produced nothing to send, which
        // on_message never does
        _ => Err(ProbeError::Protocol(
            "handshake ended without a result".to_string(),
        )),
    }
}

fn check_settled_error(handshake: &Handshake) -> Result<(), ProbeError> {
    if let Some(Outcome::Error(message)) = handshake.outcome() {
        return Err(ProbeError::Protocol(message.clone()));
    }
    Ok(())
}

/// Default header pair advertising both response framings, overlaid with
/// caller headers (caller wins on key collision).
fn build_headers(extra: &BTreeMap<String, String>) -> Result<HeaderMap, ProbeError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/event-stream"),
    );

    for (key, value) in extra {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ProbeError::Http(format!("invalid header name {key:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ProbeError::Http(format!("invalid value for header {key:?}: {e}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

async fn post_and_decode(
    client: &reqwest::Client,
    url: &str,
    headers: &HeaderMap,
    payload: &Value,
    phase: &'static str,
    per_request: Duration,
) -> Result<(JsonRpcMessage, String), ProbeError> {
    let response = client
        .post(url)
        .headers(headers.clone())
        .json(payload)
        .timeout(per_request)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ProbeError::HttpTimeout {
                    seconds: per_request.as_secs(),
                }
            } else {
                ProbeError::Http(e.to_string())
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::HttpStatus {
            phase,
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .text()
        .await
        .map_err(|e| ProbeError::Http(e.to_string()))?;

    match decode_http_body(content_type.as_deref(), &body) {
        Some(msg) => Ok((msg, body)),
        None => Err(ProbeError::MalformedResponse {
            phase,
            snippet: snippet(&body, BODY_SNIPPET_CHARS),
        }),
    }
}
