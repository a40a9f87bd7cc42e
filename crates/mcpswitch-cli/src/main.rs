//! CLI entry point - the composition root.
//!
//! Loads the config store, wires the prober stack and dispatches to the
//! command handlers.

use clap::Parser;
use mcpswitch_cli::handlers::{self, add::AddArgs};
use mcpswitch_cli::{Cli, Commands};
use mcpswitch_core::{ConfigStore, detect_system_paths};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::List => {
            let store = ConfigStore::load(&cli.config)?;
            handlers::list::execute(&store)?;
        }
        Commands::Enable { name } => {
            let mut store = ConfigStore::load(&cli.config)?;
            handlers::toggle::execute(&mut store, &name, true)?;
        }
        Commands::Disable { name } => {
            let mut store = ConfigStore::load(&cli.config)?;
            handlers::toggle::execute(&mut store, &name, false)?;
        }
        Commands::Add {
            name,
            command,
            args,
            env,
            url,
            headers,
        } => {
            let mut store = ConfigStore::load(&cli.config)?;
            handlers::add::execute(
                &mut store,
                &AddArgs {
                    name,
                    command,
                    args,
                    env,
                    url,
                    headers,
                },
            )?;
        }
        Commands::Update {
            name,
            command,
            args,
            env,
            url,
            headers,
        } => {
            let mut store = ConfigStore::load(&cli.config)?;
            handlers::update::execute(
                &mut store,
                &AddArgs {
                    name,
                    command,
                    args,
                    env,
                    url,
                    headers,
                },
            )?;
        }
        Commands::Remove { name } => {
            let mut store = ConfigStore::load(&cli.config)?;
            handlers::remove::execute(&mut store, &name)?;
        }
        Commands::Test {
            name,
            policy,
            timeout,
        } => {
            let store = ConfigStore::load(&cli.config)?;
            // System-detected directories first, then user additions, in order
            let mut extra_paths = detect_system_paths();
            extra_paths.extend(cli.extra_paths.iter().cloned());
            handlers::test::execute(&store, extra_paths, name.as_deref(), policy, timeout).await?;
        }
        Commands::Paths => {
            handlers::paths::execute(&cli.extra_paths)?;
        }
    }

    Ok(())
}
