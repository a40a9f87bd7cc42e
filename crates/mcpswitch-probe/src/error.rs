//! Probe failure taxonomy.
//!
//! Every failure path produces exactly one of these; the `Display` string is
//! the message surfaced to the user in [`mcpswitch_core::ProbeResult::Error`].

use thiserror::Error;

/// Terminal probe failures. None are retried by this crate.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The descriptor had no command to run.
    #[error("No command configured")]
    NoCommand,

    /// The descriptor had no URL to call.
    #[error("No URL configured")]
    NoUrl,

    /// The command failed the PATH existence pre-check; no process was
    /// spawned.
    #[error(
        "Command not found: \"{0}\"\n\nMake sure it is installed and available in your PATH.\nYou can widen the search with extra PATH directories."
    )]
    CommandNotFound(String),

    /// The process could not be started.
    #[error("Failed to spawn: {0}")]
    Spawn(String),

    /// The initial write to the child's stdin failed before any exchange
    /// succeeded. Later stdin failures are swallowed.
    #[error("Failed to write to stdin: {0}")]
    StdinWrite(String),

    /// The child exited before the handshake settled.
    #[error("Process exited with code {}. Stderr: {stderr_tail}", exit_code_text(.code))]
    ProcessExited {
        code: Option<i32>,
        stderr_tail: String,
    },

    /// The stdio deadline elapsed; the child was forcefully terminated.
    #[error("Timed out after {seconds}s. Stderr: {stderr_tail}")]
    Timeout { seconds: u64, stderr_tail: String },

    /// The HTTP deadline elapsed; the in-flight request was aborted.
    #[error("Connection failed: timed out after {seconds}s")]
    HttpTimeout { seconds: u64 },

    /// The server answered a handshake request with a non-2xx status.
    #[error("{phase} failed: HTTP {status}")]
    HttpStatus { phase: &'static str, status: u16 },

    /// The HTTP request itself failed (connect, TLS, invalid header, ...).
    #[error("Connection failed: {0}")]
    Http(String),

    /// The response body carried no JSON-RPC payload (or, for stdio, the
    /// expected keyed result never matched).
    #[error("Unexpected {phase} response:\n{snippet}")]
    MalformedResponse {
        phase: &'static str,
        snippet: String,
    },

    /// The remote peer's JSON-RPC `error` field was populated.
    #[error("MCP error: {0}")]
    Protocol(String),
}

/// A killed-by-signal child has no exit code.
fn exit_code_text(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

/// Truncate diagnostic text to its last `max` characters.
#[must_use]
pub fn tail(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    text.chars().skip(count - max).collect()
}

/// Truncate diagnostic text to its first `max` characters.
#[must_use]
pub fn snippet(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
