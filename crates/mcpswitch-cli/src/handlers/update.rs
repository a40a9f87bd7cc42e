//! Update command handler.

use super::add::{AddArgs, build_descriptor};
use anyhow::Result;
use mcpswitch_core::ConfigStore;

/// Replace a server's descriptor, keeping its enabled/disabled placement.
pub fn execute(store: &mut ConfigStore, update: &AddArgs) -> Result<()> {
    let descriptor = build_descriptor(update)?;
    descriptor.validate().map_err(|e| anyhow::anyhow!(e))?;

    store.update(&update.name, &descriptor)?;
    tracing::info!(server = %update.name, kind = ?descriptor.kind, "Updated MCP server");
    println!("{} updated", update.name);
    Ok(())
}
