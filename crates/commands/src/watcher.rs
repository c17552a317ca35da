//! File watcher for external edits to the project command store.
//!
//! Watches the project root directory (non-recursively) and fires when the
//! `commands.json` inside it changes, debounced so editors that write in
//! several syscalls trigger a single reload. The watcher is either
//! unattached or watching exactly one root; failing to attach (for example
//! because the root no longer exists) leaves it unattached, which only
//! disables external-edit pickup; global commands have no file to watch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_mini::new_debouncer;

/// Debounce window for store file events.
const DEBOUNCE: Duration = Duration::from_millis(500);

type Debouncer = notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>;

#[derive(Default)]
enum WatchState {
    #[default]
    Unattached,
    Watching {
        root: PathBuf,
        _debouncer: Debouncer,
    },
}

/// Watches one project's `commands.json` for changes made outside the app.
#[derive(Default)]
pub struct FileWatcher {
    state: WatchState,
}

impl FileWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `root`. `on_change` fires on the debouncer thread
    /// after each batch of store file events. On failure the watcher stays
    /// unattached.
    pub fn attach(&mut self, root: &Path, on_change: impl Fn() + Send + 'static) {
        self.detach();

        let target = runbook_paths::local_store_file(root);
        let mut debouncer = match new_debouncer(
            DEBOUNCE,
            move |res: Result<Vec<notify_debouncer_mini::DebouncedEvent>, _>| {
                if let Ok(events) = res {
                    if events.iter().any(|event| event.path == target) {
                        on_change();
                    }
                }
            },
        ) {
            Ok(debouncer) => debouncer,
            Err(e) => {
                tracing::debug!("Could not create store watcher: {}", e);
                return;
            }
        };

        if let Err(e) = debouncer
            .watcher()
            .watch(root, notify::RecursiveMode::NonRecursive)
        {
            tracing::debug!("Could not watch {:?}: {}", root, e);
            return;
        }

        tracing::info!("Watching command store under {:?}", root);
        self.state = WatchState::Watching {
            root: root.to_path_buf(),
            _debouncer: debouncer,
        };
    }

    /// Stop watching the current root (if any) and watch a new one.
    pub fn reattach(&mut self, root: &Path, on_change: impl Fn() + Send + 'static) {
        self.attach(root, on_change);
    }

    /// Stop watching.
    pub fn detach(&mut self) {
        if let WatchState::Watching { root, .. } = &self.state {
            tracing::debug!("Stopped watching {:?}", root);
        }
        self.state = WatchState::Unattached;
    }

    pub fn is_watching(&self) -> bool {
        matches!(self.state, WatchState::Watching { .. })
    }

    pub fn watched_root(&self) -> Option<&Path> {
        match &self.state {
            WatchState::Watching { root, .. } => Some(root),
            WatchState::Unattached => None,
        }
    }
}
