//! Dispatching a stored command into a terminal sink.

use commands::{CommandEntry, CommandRegistry};
use terminal::CommandSink;

/// Send a stored command into `sink`, then promote it to the front of its
/// list so recently-run commands surface first. The auto-run setting is
/// read here, at dispatch time, never cached.
pub fn dispatch(
    registry: &mut CommandRegistry,
    sink: &mut dyn CommandSink,
    entry: &CommandEntry,
) -> anyhow::Result<()> {
    dispatch_with(registry, sink, entry, settings::load_config().auto_run)
}

// The config flag and the sink parameter have opposite senses: auto-run
// submits, `hold` waits for manual confirmation. The inversion is part of
// the dispatch contract.
fn dispatch_with(
    registry: &mut CommandRegistry,
    sink: &mut dyn CommandSink,
    entry: &CommandEntry,
    auto_run: bool,
) -> anyhow::Result<()> {
    tracing::debug!(command = %entry.name, auto_run, "Dispatching command");
    sink.send(&entry.command, !auto_run)?;
    registry.move_to_front(entry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::{MemoryStore, Scope};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<(String, bool)>,
    }

    impl CommandSink for RecordingSink {
        fn send(&mut self, text: &str, hold: bool) -> anyhow::Result<()> {
            self.sent.push((text.to_string(), hold));
            Ok(())
        }
    }

    struct FailingSink;

    impl CommandSink for FailingSink {
        fn send(&mut self, _text: &str, _hold: bool) -> anyhow::Result<()> {
            anyhow::bail!("session is gone")
        }
    }

    fn registry(dir: &tempfile::TempDir) -> CommandRegistry {
        CommandRegistry::new(
            Arc::new(MemoryStore::default()),
            Some(dir.path().to_path_buf()),
        )
    }

    #[test]
    fn auto_run_off_holds_the_submission() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let mut registry = registry(&dir);
        let entry = CommandEntry::new("Test", "npm test", Scope::Local);
        registry.add(entry.clone()).expect("should add");

        let mut sink = RecordingSink::default();
        dispatch_with(&mut registry, &mut sink, &entry, false).expect("should dispatch");
        assert_eq!(sink.sent, vec![("npm test".to_string(), true)]);
    }

    #[test]
    fn auto_run_on_submits() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let mut registry = registry(&dir);
        let entry = CommandEntry::new("Test", "npm test", Scope::Local);
        registry.add(entry.clone()).expect("should add");

        let mut sink = RecordingSink::default();
        dispatch_with(&mut registry, &mut sink, &entry, true).expect("should dispatch");
        assert_eq!(sink.sent, vec![("npm test".to_string(), false)]);
    }

    #[test]
    fn dispatch_promotes_the_entry() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let mut registry = registry(&dir);
        let older = CommandEntry::new("Build", "cargo build", Scope::Local);
        let newer = CommandEntry::new("Test", "cargo test", Scope::Local);
        registry.add(older.clone()).expect("should add");
        registry.add(newer).expect("should add");

        let mut sink = RecordingSink::default();
        dispatch_with(&mut registry, &mut sink, &older, true).expect("should dispatch");

        let names: Vec<_> = registry.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Build", "Test"]);
    }

    #[test]
    fn failed_send_does_not_promote() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let mut registry = registry(&dir);
        let older = CommandEntry::new("Build", "cargo build", Scope::Local);
        registry.add(older.clone()).expect("should add");
        registry
            .add(CommandEntry::new("Test", "cargo test", Scope::Local))
            .expect("should add");

        let result = dispatch_with(&mut registry, &mut FailingSink, &older, true);
        assert!(result.is_err());

        let names: Vec<_> = registry.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Test", "Build"]);
    }
}
