//! The command registry: a merged, most-recently-used-first view over the
//! global and project-local command lists.
//!
//! The backends are the sole source of truth. The merged view is a
//! disposable cache rebuilt from both backends on every refresh, never
//! diffed. Mutations persist first and refresh after, so a failed write
//! leaves the view exactly where it was.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::entry::{CommandEntry, Scope};
use crate::error::CommandsError;
use crate::kv::KeyValueStore;
use crate::notify::ChangeNotifier;
use crate::store;

pub struct CommandRegistry {
    kv: Arc<dyn KeyValueStore>,
    project_root: Option<PathBuf>,
    merged: Vec<CommandEntry>,
    notifier: ChangeNotifier,
}

impl CommandRegistry {
    /// Create a registry over the given store and project root, loading both
    /// backends immediately.
    pub fn new(kv: Arc<dyn KeyValueStore>, project_root: Option<PathBuf>) -> Self {
        let mut registry = Self {
            kv,
            project_root,
            merged: Vec::new(),
            notifier: ChangeNotifier::default(),
        };
        registry.refresh();
        registry
    }

    /// The merged view: global commands first, then local, each scope
    /// ordered most-recently-used-or-added first.
    pub fn entries(&self) -> &[CommandEntry] {
        &self.merged
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Switch to a different project root (or none) and reload.
    pub fn set_project_root(&mut self, root: Option<PathBuf>) {
        self.project_root = root;
        self.refresh();
    }

    /// Register a handler invoked after every refresh.
    pub fn subscribe(&mut self, handler: impl Fn() + Send + 'static) {
        self.notifier.subscribe(handler);
    }

    /// Rebuild the merged view from both backends and notify subscribers.
    /// Safe to call at any time.
    pub fn refresh(&mut self) {
        let global = store::read_global(&*self.kv);
        let local = match &self.project_root {
            Some(root) => store::read_local(root),
            None => Vec::new(),
        };

        tracing::debug!(
            global = global.len(),
            local = local.len(),
            "Reloaded command lists"
        );
        self.merged = global.into_iter().chain(local).collect();
        self.notifier.publish();
    }

    /// Prepend a new entry to its scope's list and persist.
    ///
    /// Local additions require a resolved project root and lazily create the
    /// project store file.
    pub fn add(&mut self, entry: CommandEntry) -> Result<(), CommandsError> {
        match entry.scope() {
            Scope::Global => {
                let mut list = store::read_global(&*self.kv);
                list.insert(0, entry);
                store::write_global(&*self.kv, &list)?;
            }
            Scope::Local => {
                let root = self.local_root()?;
                store::ensure_local_file(&root)?;
                let mut list = store::read_local(&root);
                list.insert(0, entry);
                store::write_local(&root, &list)?;
            }
        }
        self.refresh();
        Ok(())
    }

    /// Remove the first entry matching `entry` by name from its owning list
    /// and persist. Duplicate names are not disambiguated.
    pub fn delete(&mut self, entry: &CommandEntry) -> Result<(), CommandsError> {
        if self.is_global(entry) {
            let mut list = store::read_global(&*self.kv);
            remove_first_named(&mut list, &entry.name);
            store::write_global(&*self.kv, &list)?;
        } else {
            let root = self.local_root()?;
            let mut list = store::read_local(&root);
            remove_first_named(&mut list, &entry.name);
            store::write_local(&root, &list)?;
        }
        self.refresh();
        Ok(())
    }

    /// Promote an entry to the front of its owning list and persist. Any
    /// same-named entries in that list are replaced by the given one.
    pub fn move_to_front(&mut self, entry: &CommandEntry) -> Result<(), CommandsError> {
        if self.is_global(entry) {
            let mut list = store::read_global(&*self.kv);
            list.retain(|e| e.name != entry.name);
            list.insert(0, entry.clone());
            store::write_global(&*self.kv, &list)?;
        } else {
            let root = self.local_root()?;
            let mut list = store::read_local(&root);
            list.retain(|e| e.name != entry.name);
            list.insert(0, entry.clone());
            store::write_local(&root, &list)?;
        }
        self.refresh();
        Ok(())
    }

    /// Whether an entry belongs to the global list, decided by name lookup
    /// against the store. Entries detached from the merged view do not carry
    /// an authoritative scope flag, so routing re-derives it here.
    pub fn is_global(&self, entry: &CommandEntry) -> bool {
        store::read_global(&*self.kv)
            .iter()
            .any(|e| e.name == entry.name)
    }

    fn local_root(&self) -> Result<PathBuf, CommandsError> {
        self.project_root.clone().ok_or(CommandsError::NoWorkspace)
    }
}

fn remove_first_named(list: &mut Vec<CommandEntry>, name: &str) {
    if let Some(position) = list.iter().position(|e| e.name == name) {
        list.remove(position);
    }
}
