//! Named command storage for runbook.
//!
//! Commands live in two backends: a per-project `commands.json` document and
//! one key in a persistent key-value store shared across all projects. The
//! registry merges both into a single most-recently-used-first view and keeps
//! it in sync with external edits through a debounced file watcher.

pub mod entry;
pub mod error;
pub mod kv;
pub mod notify;
pub mod registry;
pub mod store;
pub mod watcher;

pub use entry::{CommandDocument, CommandEntry, Scope};
pub use error::CommandsError;
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use notify::ChangeNotifier;
pub use registry::CommandRegistry;
pub use store::GLOBAL_COMMANDS_KEY;
pub use watcher::FileWatcher;
