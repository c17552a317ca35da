//! Centralized path management for runbook.
//!
//! All application directories are lazily initialized and cached.
//! Use `set_*` functions before first access to override for testing.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// File name of the per-project command store, relative to the project root.
pub const LOCAL_STORE_FILE_NAME: &str = "commands.json";

/// ~/.config/runbook (or platform equivalent)
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("runbook")
    })
}

/// ~/Library/Application Support/runbook (or platform equivalent)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("runbook")
    })
}

/// Override config dir (must be called before first access). For testing.
pub fn set_config_dir(path: PathBuf) {
    let _ = CONFIG_DIR.set(path);
}

/// Override data dir (must be called before first access). For testing.
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

/// Config file path: config_dir()/config.toml
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// State file backing the global key-value store: data_dir()/state.json
pub fn state_file() -> PathBuf {
    data_dir().join("state.json")
}

/// Per-project command store: `<project-root>/commands.json`
pub fn local_store_file(project_root: &Path) -> PathBuf {
    project_root.join(LOCAL_STORE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_ends_with_runbook() {
        let dir = config_dir();
        assert!(
            dir.ends_with("runbook"),
            "config_dir should end with 'runbook': {:?}",
            dir
        );
    }

    #[test]
    fn config_file_is_toml() {
        let path = config_file();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
    }

    #[test]
    fn state_file_lives_under_data_dir() {
        let path = state_file();
        assert!(path.starts_with(data_dir()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }

    #[test]
    fn local_store_file_joins_project_root() {
        let path = local_store_file(Path::new("/tmp/project"));
        assert_eq!(path, PathBuf::from("/tmp/project/commands.json"));
    }
}
