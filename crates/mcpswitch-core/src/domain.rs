//! MCP server domain types.
//!
//! These mirror the on-disk config format: each server entry is either a
//! launchable local process (stdio) or an HTTP endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a server is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    /// Local process spawned by mcpswitch, spoken to over stdin/stdout
    #[default]
    Stdio,
    /// External process reached via HTTP POST requests
    Http,
}

impl ServerKind {
    fn is_stdio(&self) -> bool {
        *self == Self::Stdio
    }
}

/// Connection description for one MCP server.
///
/// Exactly one of the stdio (`command`/`args`/`env`) or http
/// (`url`/`headers`) field groups is meaningful, selected by `kind`.
/// Config entries without a `type` key default to stdio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    /// Connection type; serialized as `type` in the config file.
    #[serde(rename = "type", default, skip_serializing_if = "ServerKind::is_stdio")]
    pub kind: ServerKind,

    /// Command to execute. Can be a bare name (resolved via PATH plus
    /// extra directories) or an absolute path. Required for stdio servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments passed to the command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment variables set on the child process, overriding the
    /// inherited environment.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Endpoint URL. Required for http servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Extra request headers, passed through verbatim. Caller headers win
    /// on collision with the defaults.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl ServerDescriptor {
    /// Create a stdio descriptor.
    #[must_use]
    pub fn stdio(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            kind: ServerKind::Stdio,
            command: Some(command.into()),
            args,
            ..Self::default()
        }
    }

    /// Create an http descriptor.
    #[must_use]
    pub fn http(url: impl Into<String>) -> Self {
        Self {
            kind: ServerKind::Http,
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Add an environment variable (stdio servers).
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add a request header (http servers).
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Validate that the field group selected by `kind` is populated.
    pub fn validate(&self) -> Result<(), String> {
        match self.kind {
            ServerKind::Stdio => {
                let command = self
                    .command
                    .as_ref()
                    .ok_or_else(|| "Stdio server requires command".to_string())?;
                if command.is_empty() {
                    return Err("Stdio server command cannot be empty".to_string());
                }
                Ok(())
            }
            ServerKind::Http => {
                let url = self
                    .url
                    .as_ref()
                    .ok_or_else(|| "HTTP server requires url".to_string())?;
                if url.is_empty() {
                    return Err("HTTP server url cannot be empty".to_string());
                }
                Ok(())
            }
        }
    }
}

/// A named server together with which side of the config it lives on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Config key naming the server.
    pub name: String,
    /// Connection description.
    pub descriptor: ServerDescriptor,
    /// Whether the entry sits in the enabled map.
    pub enabled: bool,
}
