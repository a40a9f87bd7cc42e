//! Paths command handler.

use anyhow::Result;
use mcpswitch_core::syspaths;

/// Show detected system PATH directories plus user-supplied extras.
pub fn execute(user_paths: &[String]) -> Result<()> {
    let detected = syspaths::detect_system_paths();

    if detected.is_empty() {
        println!("No system PATH directories detected.");
    } else {
        println!("System PATH directories:");
        for dir in &detected {
            let marker = if syspaths::dir_exists(dir) { " " } else { "!" };
            println!("  {marker} {dir}");
        }
    }

    if !user_paths.is_empty() {
        println!("User-added directories (--path):");
        for dir in user_paths {
            let marker = if syspaths::dir_exists(dir) { " " } else { "!" };
            println!("  {marker} {dir}");
        }
    }

    println!("\nDirectories marked '!' do not currently exist.");
    Ok(())
}
