//! Config document store.
//!
//! The config file is a single JSON object with two sub-maps: `mcpServers`
//! (enabled) and `mcpServers_disabled`. Every mutation is a read-modify-write
//! of the whole document; the store keeps the full parsed object in memory so
//! unrelated top-level keys survive a rewrite, and server entries are moved
//! between the sub-maps as raw values so unknown per-server keys survive too.

use crate::domain::{ServerDescriptor, ServerEntry};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level key holding enabled servers.
pub const ENABLED_KEY: &str = "mcpServers";
/// Top-level key holding disabled servers.
pub const DISABLED_KEY: &str = "mcpServers_disabled";

/// Errors from loading or mutating the config document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File is not valid JSON.")]
    NotJson,

    #[error("File does not contain a JSON object.")]
    NotAnObject,

    #[error("Server \"{0}\" already exists.")]
    AlreadyExists(String),

    #[error("Server \"{0}\" not found.")]
    UnknownServer(String),

    #[error("Failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
}

/// Expand a leading `~` to the user's home directory.
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches(['/', '\\']));
        }
    }
    PathBuf::from(path)
}

/// In-memory view of one config file.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    document: Map<String, Value>,
}

impl ConfigStore {
    /// Load a config file, ensuring both server sub-maps exist.
    pub fn load(path: &str) -> Result<Self, StoreError> {
        let resolved = expand_home(path.trim());
        if !resolved.exists() {
            return Err(StoreError::NotFound(resolved.display().to_string()));
        }

        let raw = std::fs::read_to_string(&resolved)?;
        let value: Value = serde_json::from_str(&raw).map_err(|_| StoreError::NotJson)?;
        let Value::Object(mut document) = value else {
            return Err(StoreError::NotAnObject);
        };

        // Ensure both blocks exist
        for key in [ENABLED_KEY, DISABLED_KEY] {
            document
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
        }

        Ok(Self {
            path: resolved,
            document,
        })
    }

    /// Resolved path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All servers from both maps, sorted by name.
    ///
    /// Entries that are not JSON objects are skipped with a warning rather
    /// than failing the whole load.
    #[must_use]
    pub fn entries(&self) -> Vec<ServerEntry> {
        let mut entries = Vec::new();
        for (key, enabled) in [(ENABLED_KEY, true), (DISABLED_KEY, false)] {
            for (name, value) in self.section(key) {
                match serde_json::from_value::<ServerDescriptor>(value.clone()) {
                    Ok(descriptor) => entries.push(ServerEntry {
                        name: name.clone(),
                        descriptor,
                        enabled,
                    }),
                    Err(e) => {
                        tracing::warn!(server = %name, error = %e, "Skipping malformed server entry");
                    }
                }
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Look up one server by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ServerEntry> {
        self.entries().into_iter().find(|e| e.name == name)
    }

    /// Move a server between the enabled and disabled maps.
    ///
    /// Moving a server that is already on the requested side (or absent from
    /// the source map) is a no-op; returns whether an entry actually moved.
    pub fn toggle(&mut self, name: &str, enable: bool) -> Result<bool, StoreError> {
        let (from, to) = if enable {
            (DISABLED_KEY, ENABLED_KEY)
        } else {
            (ENABLED_KEY, DISABLED_KEY)
        };

        let Some(value) = self.section_mut(from).remove(name) else {
            return Ok(false);
        };
        self.section_mut(to).insert(name.to_string(), value);
        self.save()?;
        Ok(true)
    }

    /// Add a new server to the enabled map.
    pub fn add(&mut self, name: &str, descriptor: &ServerDescriptor) -> Result<(), StoreError> {
        if self.section(ENABLED_KEY).contains_key(name)
            || self.section(DISABLED_KEY).contains_key(name)
        {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }

        let value = serde_json::to_value(descriptor).map_err(|_| StoreError::NotJson)?;
        self.section_mut(ENABLED_KEY).insert(name.to_string(), value);
        self.save()
    }

    /// Replace a server's descriptor in whichever map holds it.
    pub fn update(&mut self, name: &str, descriptor: &ServerDescriptor) -> Result<(), StoreError> {
        let value = serde_json::to_value(descriptor).map_err(|_| StoreError::NotJson)?;
        for key in [ENABLED_KEY, DISABLED_KEY] {
            if self.section(key).contains_key(name) {
                self.section_mut(key).insert(name.to_string(), value);
                return self.save();
            }
        }
        Err(StoreError::UnknownServer(name.to_string()))
    }

    /// Delete a server from both maps. Deleting an unknown name succeeds.
    pub fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        self.section_mut(ENABLED_KEY).remove(name);
        self.section_mut(DISABLED_KEY).remove(name);
        self.save()
    }

    fn section(&self, key: &str) -> &Map<String, Value> {
        // Both sub-maps are created as objects in load() and only ever
        // replaced with objects afterwards.
        match self.document.get(key) {
            Some(Value::Object(map)) => map,
            _ => {
                static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
                EMPTY.get_or_init(Map::new)
            }
        }
    }

    fn section_mut(&mut self, key: &str) -> &mut Map<String, Value> {
        let slot = self
            .document
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        slot.as_object_mut().unwrap_or_else(|| unreachable!())
    }

    fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&Value::Object(self.document.clone()))
            .map_err(|_| StoreError::NotJson)?;
        std::fs::write(&self.path, text + "\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const SAMPLE: &str = r#"{
        "someOtherSetting": {"nested": true},
        "mcpServers": {
            "filesystem": {"command": "npx", "args": ["-y", "@modelcontextprotocol/server-filesystem"]},
            "remote": {"type": "http", "url": "http://localhost:3001/mcp"}
        },
        "mcpServers_disabled": {
            "scratch": {"command": "node", "args": ["scratch.js"], "customKey": 7}
        }
    }"#;

    #[test]
    fn load_lists_entries_sorted_with_enabled_flags() {
        let file = write_config(SAMPLE);
        let store = ConfigStore::load(file.path().to_str().unwrap()).unwrap();

        let entries = store.entries();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["filesystem", "remote", "scratch"]);
        assert!(entries[0].enabled);
        assert!(entries[1].enabled);
        assert!(!entries[2].enabled);
    }

    #[test]
    fn load_creates_missing_sections() {
        let file = write_config("{}");
        let store = ConfigStore::load(file.path().to_str().unwrap()).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn load_rejects_missing_file() {
        let err = ConfigStore::load("/nonexistent/claude.json").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn load_rejects_non_object() {
        let file = write_config("[1, 2, 3]");
        let err = ConfigStore::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject));
    }

    #[test]
    fn load_rejects_invalid_json() {
        let file = write_config("{not json");
        let err = ConfigStore::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::NotJson));
    }

    #[test]
    fn toggle_moves_entry_and_preserves_unknown_keys() {
        let file = write_config(SAMPLE);
        let path = file.path().to_str().unwrap().to_string();

        let mut store = ConfigStore::load(&path).unwrap();
        assert!(store.toggle("scratch", true).unwrap());

        // Reload from disk: entry moved, custom key intact, unrelated
        // top-level keys untouched
        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["mcpServers"]["scratch"]["customKey"], 7);
        assert!(doc["mcpServers_disabled"].get("scratch").is_none());
        assert_eq!(doc["someOtherSetting"]["nested"], true);
    }

    #[test]
    fn toggle_absent_server_is_noop() {
        let file = write_config(SAMPLE);
        let mut store = ConfigStore::load(file.path().to_str().unwrap()).unwrap();
        assert!(!store.toggle("missing", false).unwrap());
        // Already enabled, so enabling again moves nothing
        assert!(!store.toggle("filesystem", true).unwrap());
    }

    #[test]
    fn add_rejects_duplicates_across_both_maps() {
        let file = write_config(SAMPLE);
        let mut store = ConfigStore::load(file.path().to_str().unwrap()).unwrap();

        let descriptor = ServerDescriptor::stdio("echo", vec![]);
        assert!(matches!(
            store.add("filesystem", &descriptor),
            Err(StoreError::AlreadyExists(_))
        ));
        assert!(matches!(
            store.add("scratch", &descriptor),
            Err(StoreError::AlreadyExists(_))
        ));

        store.add("fresh", &descriptor).unwrap();
        assert!(store.get("fresh").is_some_and(|e| e.enabled));
    }

    #[test]
    fn update_replaces_in_place_and_errors_on_unknown() {
        let file = write_config(SAMPLE);
        let mut store = ConfigStore::load(file.path().to_str().unwrap()).unwrap();

        let descriptor = ServerDescriptor::http("http://localhost:9999/mcp");
        store.update("scratch", &descriptor).unwrap();
        let entry = store.get("scratch").unwrap();
        assert!(!entry.enabled);
        assert_eq!(entry.descriptor.url.as_deref(), Some("http://localhost:9999/mcp"));

        assert!(matches!(
            store.update("missing", &descriptor),
            Err(StoreError::UnknownServer(_))
        ));
    }

    #[test]
    fn remove_deletes_from_both_maps() {
        let file = write_config(SAMPLE);
        let mut store = ConfigStore::load(file.path().to_str().unwrap()).unwrap();

        store.remove("filesystem").unwrap();
        store.remove("scratch").unwrap();
        store.remove("never-existed").unwrap();

        let names: Vec<String> = store.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["remote".to_string()]);
    }

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        assert_eq!(expand_home("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
    }
}
