//! Single-probe controller.

use crate::error::ProbeError;
use crate::{http, lookup, stdio};
use async_trait::async_trait;
use mcpswitch_core::{ProbeResult, ServerDescriptor, ServerKind, ToolSummary};
use std::time::Duration;

/// Hard deadline covering one entire handshake.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A source of terminal probe outcomes.
///
/// Behind a trait so the batch scheduler can be exercised without spawning
/// processes or opening sockets.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one server. Always returns a terminal result — exactly one
    /// `Success` or `Error` per invocation, never `Testing`.
    async fn probe(&self, descriptor: &ServerDescriptor, extra_paths: &[String]) -> ProbeResult;
}

/// The real prober: spawns processes or issues HTTP requests.
pub struct McpProber {
    deadline: Duration,
    http: reqwest::Client,
}

impl McpProber {
    /// Prober with the default 60-second deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::with_deadline(DEFAULT_TIMEOUT)
    }

    /// Prober with a custom deadline (mainly for tests).
    #[must_use]
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline,
            http: reqwest::Client::new(),
        }
    }

    async fn probe_inner(
        &self,
        descriptor: &ServerDescriptor,
        extra_paths: &[String],
    ) -> Result<Vec<ToolSummary>, ProbeError> {
        match descriptor.kind {
            ServerKind::Http => http::probe_http(&self.http, descriptor, self.deadline).await,
            ServerKind::Stdio => {
                let command = descriptor.command.as_deref().ok_or(ProbeError::NoCommand)?;

                // Cheap precondition: a missing executable fails fast with a
                // specific message instead of waiting out the deadline
                if !lookup::command_exists(command, extra_paths) {
                    return Err(ProbeError::CommandNotFound(command.to_string()));
                }

                stdio::probe_stdio(descriptor, extra_paths, self.deadline).await
            }
        }
    }
}

impl Default for McpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for McpProber {
    async fn probe(&self, descriptor: &ServerDescriptor, extra_paths: &[String]) -> ProbeResult {
        match self.probe_inner(descriptor, extra_paths).await {
            Ok(tools) => {
                tracing::info!(tool_count = tools.len(), "Probe succeeded");
                ProbeResult::success(tools)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Probe failed");
                ProbeResult::error(e.to_string())
            }
        }
    }
}
