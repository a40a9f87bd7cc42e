//! CLI layer for mcpswitch.
//!
//! `commands` defines the clap surface; `handlers` hold one module per
//! subcommand. `main.rs` is the composition root that wires them together.

pub mod commands;
pub mod handlers;

pub use commands::{Cli, Commands};
