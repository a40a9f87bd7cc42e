//! MCP server connectivity prober.
//!
//! Given a server's connection description — a launchable local process or
//! an HTTP endpoint — this crate performs the two-phase MCP handshake
//! (`initialize`, then `notifications/initialized` + `tools/list`) under a
//! hard deadline and reports a [`ProbeResult`]. A bounded worker pool runs
//! many probes concurrently under one of four target-selection policies.
//!
//! The handshake state machine is transport-agnostic; stdio and http share
//! it behind different framing (newline-delimited JSON vs. SSE-or-JSON
//! bodies).

pub mod batch;
pub mod board;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod jsonrpc;
pub mod lookup;
pub mod probe;

mod http;
mod stdio;

pub use batch::{BatchPolicy, BatchRunner, MAX_CONCURRENT_PROBES};
pub use board::ResultBoard;
pub use error::ProbeError;
pub use probe::{DEFAULT_TIMEOUT, McpProber, Prober};

// Re-export the domain types callers need alongside probes
pub use mcpswitch_core::{ProbeResult, ServerDescriptor, ServerEntry, ServerKind, ToolSummary};
