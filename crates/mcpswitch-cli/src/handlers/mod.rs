//! One handler module per subcommand.

pub mod add;
pub mod list;
pub mod paths;
pub mod remove;
pub mod toggle;
pub mod update;

/// Split a repeatable `KEY=VALUE` flag into a pair.
pub(crate) fn parse_key_value(raw: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        anyhow::bail!("expected KEY=VALUE, got '{raw}'");
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_key_value;

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(
            parse_key_value("API_KEY=secret").unwrap(),
            ("API_KEY".to_string(), "secret".to_string())
        );
        // Values may themselves contain '='
        assert_eq!(
            parse_key_value("QUERY=a=b").unwrap(),
            ("QUERY".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_key_value("no-equals").is_err());
        assert!(parse_key_value("=value").is_err());
    }
}
