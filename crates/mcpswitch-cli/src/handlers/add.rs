//! Add command handler.

use super::parse_key_value;
use anyhow::Result;
use mcpswitch_core::{ConfigStore, ServerDescriptor, ServerKind};

pub struct AddArgs {
    pub name: String,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub env: Vec<String>,
    pub url: Option<String>,
    pub headers: Vec<String>,
}

/// Insert a new server into the enabled map.
pub fn execute(store: &mut ConfigStore, add: &AddArgs) -> Result<()> {
    let descriptor = build_descriptor(add)?;
    descriptor.validate().map_err(|e| anyhow::anyhow!(e))?;

    store.add(&add.name, &descriptor)?;
    tracing::info!(server = %add.name, kind = ?descriptor.kind, "Added MCP server");
    println!("{} added", add.name);
    Ok(())
}

pub(crate) fn build_descriptor(add: &AddArgs) -> Result<ServerDescriptor> {
    let mut descriptor = match (&add.command, &add.url) {
        (Some(command), None) => ServerDescriptor::stdio(command.clone(), add.args.clone()),
        (None, Some(url)) => ServerDescriptor::http(url.clone()),
        _ => anyhow::bail!("specify exactly one of --command or --url"),
    };

    match descriptor.kind {
        ServerKind::Stdio => {
            for pair in &add.env {
                let (key, value) = parse_key_value(pair)?;
                descriptor.env.insert(key, value);
            }
            if !add.headers.is_empty() {
                anyhow::bail!("--header only applies to --url servers");
            }
        }
        ServerKind::Http => {
            for pair in &add.headers {
                let (key, value) = parse_key_value(pair)?;
                descriptor.headers.insert(key, value);
            }
            if !add.env.is_empty() {
                anyhow::bail!("--env only applies to --command servers");
            }
        }
    }

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(name: &str) -> AddArgs {
        AddArgs {
            name: name.to_string(),
            command: None,
            args: vec![],
            env: vec![],
            url: None,
            headers: vec![],
        }
    }

    #[test]
    fn builds_stdio_descriptor_with_env() {
        let mut add = args("fs");
        add.command = Some("npx".to_string());
        add.args = vec!["-y".to_string(), "@x/server".to_string()];
        add.env = vec!["TOKEN=abc".to_string()];

        let descriptor = build_descriptor(&add).unwrap();
        assert_eq!(descriptor.kind, ServerKind::Stdio);
        assert_eq!(descriptor.env.get("TOKEN").map(String::as_str), Some("abc"));
    }

    #[test]
    fn builds_http_descriptor_with_headers() {
        let mut add = args("remote");
        add.url = Some("http://localhost:3001/mcp".to_string());
        add.headers = vec!["Authorization=Bearer x".to_string()];

        let descriptor = build_descriptor(&add).unwrap();
        assert_eq!(descriptor.kind, ServerKind::Http);
        assert_eq!(
            descriptor.headers.get("Authorization").map(String::as_str),
            Some("Bearer x")
        );
    }

    #[test]
    fn rejects_neither_and_mixed_flags() {
        assert!(build_descriptor(&args("empty")).is_err());

        let mut mixed = args("mixed");
        mixed.command = Some("npx".to_string());
        mixed.headers = vec!["K=V".to_string()];
        assert!(build_descriptor(&mixed).is_err());
    }
}
