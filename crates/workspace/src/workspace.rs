//! Presentation bridge between the command registry and the host surface.
//!
//! Owns the shared registry, the store file watcher, and the terminal
//! sessions commands are dispatched into. Rendering is the caller's
//! business: this crate only turns registry state into list rows and user
//! actions into registry mutations.

mod dispatch;
mod items;
mod project;

pub use dispatch::dispatch;
pub use items::{list_items, CommandListItem};
pub use project::resolve_project_root;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use commands::{CommandEntry, CommandRegistry, FileWatcher, KeyValueStore, Scope};
use parking_lot::Mutex;
use terminal::TerminalSession;

/// Display name for sessions this tool spawns.
const SESSION_NAME: &str = "runbook";

pub struct Workspace {
    registry: Arc<Mutex<CommandRegistry>>,
    watcher: FileWatcher,
    /// The session `run` reuses; replaced lazily once its shell exits.
    current: Option<TerminalSession>,
    /// Sessions spawned by send-to-new, kept alive for the app's lifetime.
    extra: Vec<TerminalSession>,
}

impl Workspace {
    pub fn new(kv: Arc<dyn KeyValueStore>, project_root: Option<PathBuf>) -> Self {
        let registry = Arc::new(Mutex::new(CommandRegistry::new(kv, project_root.clone())));
        let mut workspace = Self {
            registry,
            watcher: FileWatcher::new(),
            current: None,
            extra: Vec::new(),
        };
        workspace.attach_watcher(project_root.as_deref());
        workspace
    }

    /// Register a handler invoked after every registry refresh. Handlers run
    /// on the refreshing thread with the registry locked, so they must not
    /// call back into this workspace.
    pub fn subscribe(&self, handler: impl Fn() + Send + 'static) {
        self.registry.lock().subscribe(handler);
    }

    pub fn project_root(&self) -> Option<PathBuf> {
        self.registry.lock().project_root().map(Path::to_path_buf)
    }

    /// Switch to a different project root (or none): reload the registry and
    /// re-point the watcher.
    pub fn set_project_root(&mut self, root: Option<PathBuf>) {
        tracing::info!("Switching project root to {:?}", root);
        self.registry.lock().set_project_root(root.clone());
        self.attach_watcher(root.as_deref());
    }

    /// Display rows for the current merged view.
    pub fn items(&self) -> Vec<CommandListItem> {
        list_items(&self.registry.lock())
    }

    /// The merged-view entry at `index`, if any.
    pub fn entry_at(&self, index: usize) -> Option<CommandEntry> {
        self.registry.lock().entries().get(index).cloned()
    }

    /// Handle an add-form submission. Empty fields are rejected before any
    /// backend is touched.
    pub fn add_command(&self, name: &str, command: &str, scope: Scope) -> Result<()> {
        validate_form(name, command)?;
        self.registry
            .lock()
            .add(CommandEntry::new(name, command, scope))?;
        Ok(())
    }

    /// Handle an edit-form submission: the original entry is deleted and the
    /// edited one recreated at the front of its (possibly new) scope.
    pub fn edit_command(
        &self,
        original: &CommandEntry,
        name: &str,
        command: &str,
        scope: Scope,
    ) -> Result<()> {
        validate_form(name, command)?;
        let mut registry = self.registry.lock();
        registry.delete(original)?;
        registry.add(CommandEntry::new(name, command, scope))?;
        Ok(())
    }

    /// Delete an entry after a blocking yes/no confirmation. Returns whether
    /// the entry was actually deleted.
    pub fn delete_command(
        &self,
        entry: &CommandEntry,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool> {
        let prompt = format!("Are you sure you want to delete \"{}\"?", entry.name);
        if !confirm(&prompt) {
            return Ok(false);
        }
        self.registry.lock().delete(entry)?;
        Ok(true)
    }

    /// Reload both backends.
    pub fn refresh(&self) {
        self.registry.lock().refresh();
    }

    /// Flip the auto-run setting; returns the new value.
    pub fn toggle_auto_run(&self) -> Result<bool> {
        settings::toggle_auto_run()
    }

    /// Dispatch into the reusable session, spawning one if none is alive.
    pub fn send_to_current(&mut self, entry: &CommandEntry) -> Result<()> {
        let registry = self.registry.clone();
        let root = self.project_root();

        if !self.current.as_mut().is_some_and(|s| s.is_running()) {
            self.current = Some(TerminalSession::spawn(SESSION_NAME, root.as_deref())?);
        }
        let Some(session) = self.current.as_mut() else {
            anyhow::bail!("no terminal session available");
        };
        let result = dispatch(&mut registry.lock(), session, entry);
        result
    }

    /// Dispatch into a freshly spawned session.
    pub fn send_to_new(&mut self, entry: &CommandEntry) -> Result<()> {
        let registry = self.registry.clone();
        let root = self.project_root();

        let mut session = TerminalSession::spawn(SESSION_NAME, root.as_deref())?;
        dispatch(&mut registry.lock(), &mut session, entry)?;
        self.extra.push(session);
        Ok(())
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_watching()
    }

    fn attach_watcher(&mut self, root: Option<&Path>) {
        match root {
            Some(root) => {
                let registry = self.registry.clone();
                self.watcher.attach(root, move || registry.lock().refresh());
            }
            None => self.watcher.detach(),
        }
    }
}

fn validate_form(name: &str, command: &str) -> Result<()> {
    if name.trim().is_empty() || command.trim().is_empty() {
        anyhow::bail!("Please fill in both a name and a command");
    }
    Ok(())
}
