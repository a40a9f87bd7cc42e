//! Core domain types and configuration plumbing for mcpswitch.
//!
//! This crate holds everything that is not probe logic: the server
//! descriptor model shared across the workspace, the claude.json-style
//! document store, and system PATH directory detection.

pub mod domain;
pub mod result;
pub mod store;
pub mod syspaths;

pub use domain::{ServerDescriptor, ServerEntry, ServerKind};
pub use result::{ProbeResult, ToolSummary};
pub use store::{ConfigStore, StoreError};
pub use syspaths::detect_system_paths;
