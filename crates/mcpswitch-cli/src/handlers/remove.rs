//! Remove command handler.

use anyhow::Result;
use mcpswitch_core::ConfigStore;

/// Delete a server from both maps.
pub fn execute(store: &mut ConfigStore, name: &str) -> Result<()> {
    if store.get(name).is_none() {
        anyhow::bail!("Server \"{name}\" not found.");
    }

    store.remove(name)?;
    tracing::info!(server = %name, "Removed MCP server");
    println!("{name} deleted");
    Ok(())
}
