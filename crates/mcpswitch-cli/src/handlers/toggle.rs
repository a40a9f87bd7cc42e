//! Enable/disable command handler.

use anyhow::Result;
use mcpswitch_core::ConfigStore;

/// Move a server between the enabled and disabled maps.
pub fn execute(store: &mut ConfigStore, name: &str, enable: bool) -> Result<()> {
    if store.get(name).is_none() {
        anyhow::bail!("Server \"{name}\" not found.");
    }

    let moved = store.toggle(name, enable)?;
    let state = if enable { "enabled" } else { "disabled" };
    if moved {
        tracing::info!(server = %name, state, "Toggled MCP server");
        println!("{name} {state}");
    } else {
        println!("{name} is already {state}");
    }
    Ok(())
}
