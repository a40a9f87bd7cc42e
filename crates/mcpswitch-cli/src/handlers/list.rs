//! List command handler.

use anyhow::Result;
use mcpswitch_core::{ConfigStore, ServerKind};

/// Print every configured server with its enabled state.
pub fn execute(store: &ConfigStore) -> Result<()> {
    let entries = store.entries();

    if entries.is_empty() {
        println!("No MCP servers configured in {}.", store.path().display());
        println!("Use 'mcpswitch add <name> --command ... | --url ...' to add one.");
        return Ok(());
    }

    println!(
        "{} server(s) in {}:\n",
        entries.len(),
        store.path().display()
    );
    println!("{:<10} {:<6} {:<24} Target", "State", "Type", "Name");

    for entry in entries {
        let state = if entry.enabled { "enabled" } else { "disabled" };
        let (kind, target) = match entry.descriptor.kind {
            ServerKind::Stdio => {
                let mut target = entry.descriptor.command.clone().unwrap_or_default();
                if !entry.descriptor.args.is_empty() {
                    target.push(' ');
                    target.push_str(&entry.descriptor.args.join(" "));
                }
                ("stdio", target)
            }
            ServerKind::Http => (
                "http",
                entry.descriptor.url.clone().unwrap_or_default(),
            ),
        };
        println!("{state:<10} {kind:<6} {:<24} {target}", entry.name);
    }

    Ok(())
}
