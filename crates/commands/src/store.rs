//! Persistence for the two command backends.
//!
//! Local commands live in `<project-root>/commands.json`; global commands
//! live under one key in the injected [`KeyValueStore`]. Reads are tolerant:
//! a backend that is missing or cannot be parsed yields an empty list, and
//! parse failures are logged so corruption stays visible without changing
//! the caller-facing contract.

use std::path::Path;

use crate::entry::{CommandDocument, CommandEntry};
use crate::error::CommandsError;
use crate::kv::KeyValueStore;

/// Key holding the global command list in the key-value store.
pub const GLOBAL_COMMANDS_KEY: &str = "global-commands";

/// Read the project's command list. A store that is missing or cannot be
/// parsed yields an empty list.
pub fn read_local(project_root: &Path) -> Vec<CommandEntry> {
    let path = runbook_paths::local_store_file(project_root);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read {:?}: {}", path, e);
            }
            return Vec::new();
        }
    };

    match serde_json::from_str::<CommandDocument>(&content) {
        Ok(document) => document.commands,
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Write the project's command list as a pretty-printed document, creating
/// parent directories if absent.
pub fn write_local(project_root: &Path, entries: &[CommandEntry]) -> Result<(), CommandsError> {
    let path = runbook_paths::local_store_file(project_root);
    let document = CommandDocument {
        commands: entries.to_vec(),
    };
    let content = serde_json::to_string_pretty(&document).map_err(|e| CommandsError::Write {
        path: path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CommandsError::Write {
            path: path.clone(),
            source: e,
        })?;
    }
    std::fs::write(&path, content).map_err(|e| CommandsError::Write {
        path: path.clone(),
        source: e,
    })
}

/// Create the project store containing an empty list if it does not exist.
pub fn ensure_local_file(project_root: &Path) -> Result<(), CommandsError> {
    let path = runbook_paths::local_store_file(project_root);
    if !path.exists() {
        write_local(project_root, &[])?;
        tracing::info!("Created command store at {:?}", path);
    }
    Ok(())
}

/// Read the global command list from the key-value store. An absent or
/// malformed value yields an empty list.
pub fn read_global(store: &dyn KeyValueStore) -> Vec<CommandEntry> {
    let Some(value) = store.get(GLOBAL_COMMANDS_KEY) else {
        return Vec::new();
    };

    match serde_json::from_value(value) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to parse global command list: {}", e);
            Vec::new()
        }
    }
}

/// Replace the global command list in the key-value store.
pub fn write_global(
    store: &dyn KeyValueStore,
    entries: &[CommandEntry],
) -> Result<(), CommandsError> {
    let value = serde_json::to_value(entries).map_err(|e| CommandsError::Store(e.to_string()))?;
    store
        .set(GLOBAL_COMMANDS_KEY, value)
        .map_err(|e| CommandsError::Store(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Scope;
    use crate::kv::MemoryStore;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, command: &str, scope: Scope) -> CommandEntry {
        CommandEntry::new(name, command, scope)
    }

    #[test]
    fn local_round_trip_preserves_order_and_fields() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let entries = vec![
            entry("Build", "cargo build", Scope::Local),
            entry("Test", "cargo test", Scope::Local),
        ];

        write_local(dir.path(), &entries).expect("should write");
        assert_eq!(read_local(dir.path()), entries);
    }

    #[test]
    fn read_local_missing_file_is_empty_and_creates_nothing() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        assert!(read_local(dir.path()).is_empty());
        assert!(!runbook_paths::local_store_file(dir.path()).exists());
    }

    #[test]
    fn read_local_malformed_json_is_empty() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        std::fs::write(
            runbook_paths::local_store_file(dir.path()),
            "{ commands: oops",
        )
        .expect("should write");
        assert!(read_local(dir.path()).is_empty());
    }

    #[test]
    fn read_local_missing_commands_field_is_empty() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        std::fs::write(runbook_paths::local_store_file(dir.path()), "{}").expect("should write");
        assert!(read_local(dir.path()).is_empty());
    }

    #[test]
    fn ensure_local_file_bootstraps_empty_document() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        ensure_local_file(dir.path()).expect("should create");

        let content = std::fs::read_to_string(runbook_paths::local_store_file(dir.path()))
            .expect("should read");
        let document: serde_json::Value = serde_json::from_str(&content).expect("should parse");
        assert_eq!(document, serde_json::json!({ "commands": [] }));
    }

    #[test]
    fn ensure_local_file_leaves_existing_content_alone() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let entries = vec![entry("Deploy", "make deploy", Scope::Local)];
        write_local(dir.path(), &entries).expect("should write");

        ensure_local_file(dir.path()).expect("should be a no-op");
        assert_eq!(read_local(dir.path()), entries);
    }

    #[test]
    fn write_local_pretty_prints_with_two_space_indent() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        write_local(dir.path(), &[entry("Build", "cargo build", Scope::Local)])
            .expect("should write");

        let content = std::fs::read_to_string(runbook_paths::local_store_file(dir.path()))
            .expect("should read");
        assert!(content.starts_with("{\n  \"commands\": ["));
    }

    #[test]
    fn global_round_trip_preserves_order_and_fields() {
        let store = MemoryStore::default();
        let entries = vec![
            entry("Deploy", "npm run deploy", Scope::Global),
            entry("Lint", "npm run lint", Scope::Global),
        ];

        write_global(&store, &entries).expect("should write");
        assert_eq!(read_global(&store), entries);
    }

    #[test]
    fn read_global_empty_store_is_empty() {
        let store = MemoryStore::default();
        assert!(read_global(&store).is_empty());
    }

    #[test]
    fn read_global_malformed_value_is_empty() {
        let store = MemoryStore::default();
        store
            .set(GLOBAL_COMMANDS_KEY, serde_json::json!("not a list"))
            .expect("should set");
        assert!(read_global(&store).is_empty());
    }
}
