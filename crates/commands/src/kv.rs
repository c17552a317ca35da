//! Key-value store capability.
//!
//! The registry depends on this narrow interface rather than any concrete
//! storage; the shipped implementation is a flat JSON document on disk, and
//! tests inject [`MemoryStore`].

use std::path::PathBuf;

use serde_json::Value;

/// A persistent key-value store whose lifetime exceeds any single registry
/// instance.
///
/// `set` returns only after the write is durable, so a caller that persists
/// and then re-reads is guaranteed to observe its own write.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Durably store `value` under `key`.
    fn set(&self, key: &str, value: Value) -> anyhow::Result<()>;
}

/// [`KeyValueStore`] backed by one pretty-printed JSON object document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the application's default state file location.
    pub fn at_default_location() -> Self {
        Self::new(runbook_paths::state_file())
    }

    fn read_document(&self) -> serde_json::Map<String, Value> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read state file {:?}: {}", self.path, e);
                }
                return serde_json::Map::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!("State file {:?} is not a JSON object; ignoring", self.path);
                serde_json::Map::new()
            }
            Err(e) => {
                tracing::warn!("Failed to parse state file {:?}: {}", self.path, e);
                serde_json::Map::new()
            }
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.read_document().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        use anyhow::Context;

        let mut document = self.read_document();
        document.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(document))
            .context("Failed to serialize state document")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write state file: {:?}", self.path))?;
        Ok(())
    }
}

/// In-memory [`KeyValueStore`] for tests.
#[derive(Default)]
pub struct MemoryStore {
    values: parking_lot::Mutex<serde_json::Map<String, Value>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_store_round_trips_a_value() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let store = JsonFileStore::new(dir.path().join("state.json"));

        store
            .set("answer", serde_json::json!(42))
            .expect("should set");
        assert_eq!(store.get("answer"), Some(serde_json::json!(42)));
    }

    #[test]
    fn file_store_missing_file_yields_nothing() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn file_store_set_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let path = dir.path().join("nested").join("deep").join("state.json");
        let store = JsonFileStore::new(path.clone());

        store.set("k", serde_json::json!("v")).expect("should set");
        assert!(path.exists());
    }

    #[test]
    fn file_store_preserves_other_keys_on_set() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let store = JsonFileStore::new(dir.path().join("state.json"));

        store.set("a", serde_json::json!(1)).expect("should set");
        store.set("b", serde_json::json!(2)).expect("should set");
        assert_eq!(store.get("a"), Some(serde_json::json!(1)));
        assert_eq!(store.get("b"), Some(serde_json::json!(2)));
    }

    #[test]
    fn file_store_malformed_document_degrades_to_empty() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json {{{").expect("should write");

        let store = JsonFileStore::new(path);
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn memory_store_round_trips_a_value() {
        let store = MemoryStore::default();
        store
            .set("key", serde_json::json!(["a", "b"]))
            .expect("should set");
        assert_eq!(store.get("key"), Some(serde_json::json!(["a", "b"])));
    }
}
