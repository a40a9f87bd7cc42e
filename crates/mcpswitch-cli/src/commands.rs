//! Command-line surface.

use clap::{Parser, Subcommand};
use mcpswitch_probe::BatchPolicy;

/// Inspect, toggle and probe MCP server entries in a claude.json-style
/// config file.
#[derive(Parser)]
#[command(name = "mcpswitch", version, about)]
pub struct Cli {
    /// Config file holding the mcpServers / mcpServers_disabled maps
    #[arg(
        long,
        global = true,
        default_value = "~/.claude.json",
        env = "MCPSWITCH_CONFIG"
    )]
    pub config: String,

    /// Extra directory to search for server commands (repeatable)
    #[arg(long = "path", global = true, value_name = "DIR")]
    pub extra_paths: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List all configured servers
    List,

    /// Move a server into the enabled map
    Enable {
        /// Server name
        name: String,
    },

    /// Move a server into the disabled map
    Disable {
        /// Server name
        name: String,
    },

    /// Add a new server (enabled)
    Add {
        /// Server name
        name: String,
        /// Command to launch (stdio servers)
        #[arg(long, conflicts_with = "url")]
        command: Option<String>,
        /// Argument passed to the command (repeatable, in order)
        #[arg(long = "arg", value_name = "ARG")]
        args: Vec<String>,
        /// KEY=VALUE environment variable for the child (repeatable)
        #[arg(long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
        /// Endpoint URL (http servers)
        #[arg(long)]
        url: Option<String>,
        /// KEY=VALUE request header (repeatable)
        #[arg(long = "header", value_name = "KEY=VALUE")]
        headers: Vec<String>,
    },

    /// Replace an existing server's connection settings
    Update {
        /// Server name
        name: String,
        /// Command to launch (stdio servers)
        #[arg(long, conflicts_with = "url")]
        command: Option<String>,
        /// Argument passed to the command (repeatable, in order)
        #[arg(long = "arg", value_name = "ARG")]
        args: Vec<String>,
        /// KEY=VALUE environment variable for the child (repeatable)
        #[arg(long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
        /// Endpoint URL (http servers)
        #[arg(long)]
        url: Option<String>,
        /// KEY=VALUE request header (repeatable)
        #[arg(long = "header", value_name = "KEY=VALUE")]
        headers: Vec<String>,
    },

    /// Remove a server from both maps
    Remove {
        /// Server name
        name: String,
    },

    /// Probe one server, or run a batch under a selection policy
    Test {
        /// Probe a single server by name; omit to run a batch
        name: Option<String>,
        /// Batch policy: test-enabled, retest-enabled, test-all, retest-all
        #[arg(long, default_value = "test-enabled")]
        policy: BatchPolicy,
        /// Probe deadline in seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,
    },

    /// Show detected system PATH directories
    Paths,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_parses_policy() {
        let cli = Cli::parse_from(["mcpswitch", "test", "--policy", "retest-all"]);
        let Some(Commands::Test { name, policy, .. }) = cli.command else {
            panic!("expected test command");
        };
        assert!(name.is_none());
        assert_eq!(policy, BatchPolicy::RetestAll);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(Cli::try_parse_from(["mcpswitch", "test", "--policy", "sometimes"]).is_err());
    }

    #[test]
    fn global_paths_accumulate() {
        let cli = Cli::parse_from([
            "mcpswitch",
            "test",
            "--path",
            "/opt/tools/bin",
            "--path",
            "/custom/bin",
        ]);
        assert_eq!(cli.extra_paths, vec!["/opt/tools/bin", "/custom/bin"]);
    }
}
