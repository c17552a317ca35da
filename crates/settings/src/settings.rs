//! TOML config file support.
//!
//! Config location: `~/.config/runbook/config.toml`

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Maximum config file size in bytes (64 KB).
/// Config files should be tiny; anything larger is suspicious.
const MAX_FILE_SIZE: u64 = 64 * 1024;

/// User-facing config parsed from TOML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Submit dispatched commands immediately. When false, dispatched text
    /// is typed into the terminal and waits for manual confirmation.
    pub auto_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { auto_run: false }
    }
}

/// Default config file content with comments (generated on first launch).
const DEFAULT_CONFIG: &str = r#"# Runbook Configuration
# Changes are applied on the next command dispatch; just save this file.

# Submit dispatched commands immediately.
# When false, the command is typed into the terminal without pressing
# enter, so you can review it before running.
auto-run = false
"#;

/// Return the config file path.
pub fn config_path() -> PathBuf {
    runbook_paths::config_file()
}

/// Ensure the config file exists, creating a default if missing.
/// Returns the path to the config file.
pub fn ensure_config_file() -> Result<PathBuf> {
    let path = config_path();
    if !path.exists() {
        let parent = path
            .parent()
            .context("Config file path has no parent directory")?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        std::fs::write(&path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write default config: {:?}", path))?;
        tracing::info!("Created default config at {:?}", path);
    }
    Ok(path)
}

/// Load and parse the config file. Returns default on any error.
pub fn load_config() -> Config {
    let path = config_path();

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config: {}", e);
            }
            return Config::default();
        }
    };

    // Size guard
    if content.len() > MAX_FILE_SIZE as usize {
        tracing::warn!(
            "Config file too large ({} bytes), using defaults",
            content.len()
        );
        return Config::default();
    }

    match toml::from_str(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Failed to parse config.toml: {}", e);
            Config::default()
        }
    }
}

/// Flip the auto-run flag in the config file (preserving comments and
/// formatting) and return the new value.
pub fn toggle_auto_run() -> Result<bool> {
    let path = ensure_config_file()?;
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;

    // A malformed file falls back to a fresh document; user comments are
    // only lost when the file was already unparseable.
    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .unwrap_or_default();
    let enabled = toggle_auto_run_in(&mut doc);

    std::fs::write(&path, doc.to_string())
        .with_context(|| format!("Failed to write config: {:?}", path))?;
    Ok(enabled)
}

fn toggle_auto_run_in(doc: &mut toml_edit::DocumentMut) -> bool {
    let current = doc
        .get("auto-run")
        .and_then(|item| item.as_bool())
        .unwrap_or(Config::default().auto_run);
    let next = !current;
    doc["auto-run"] = toml_edit::value(next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn default_config_has_auto_run_off() {
        assert!(!Config::default().auto_run);
    }

    #[test_case("auto-run = true", true; "explicit on")]
    #[test_case("auto-run = false", false; "explicit off")]
    #[test_case("", false; "empty file")]
    fn parses_auto_run(toml_str: &str, expected: bool) {
        let cfg: Config = toml::from_str(toml_str).expect("should parse");
        assert_eq!(cfg.auto_run, expected);
    }

    #[test]
    fn ignores_unknown_keys() {
        let toml_str = r#"
auto-run = true
unknown-key = "whatever"
"#;
        let result: Result<Config, _> = toml::from_str(toml_str);
        assert!(result.is_ok());
    }

    #[test]
    fn default_config_template_is_valid_toml() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG).expect("template should parse");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn toggle_flips_the_flag_in_place() {
        let mut doc = "auto-run = false\n"
            .parse::<toml_edit::DocumentMut>()
            .expect("should parse");
        assert!(toggle_auto_run_in(&mut doc));
        assert!(!toggle_auto_run_in(&mut doc));
    }

    #[test]
    fn toggle_preserves_comments_and_unrelated_keys() {
        let source = "# keep this comment\nauto-run = false\n\n# and this one\nfuture-key = 3\n";
        let mut doc = source
            .parse::<toml_edit::DocumentMut>()
            .expect("should parse");

        toggle_auto_run_in(&mut doc);
        let written = doc.to_string();
        assert!(written.contains("# keep this comment"));
        assert!(written.contains("# and this one"));
        assert!(written.contains("future-key = 3"));
        assert!(written.contains("auto-run = true"));
    }

    #[test]
    fn toggle_on_missing_key_enables_from_default() {
        let mut doc = "# empty\n"
            .parse::<toml_edit::DocumentMut>()
            .expect("should parse");
        assert!(toggle_auto_run_in(&mut doc));
    }
}
