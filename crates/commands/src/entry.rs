//! Command entry data model and on-disk document shape.

use serde::{Deserialize, Serialize};

/// Which backend owns an entry: the shared store or the current project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

/// A named shell command.
///
/// `command` is arbitrary text handed verbatim to a shell; it is neither
/// validated nor escaped. `name` is a display string and is not guaranteed
/// unique. The serialized `global` flag records the scope an entry was
/// created with, but routing decisions go through the registry's lookup,
/// the flag is not authoritative once entries sit in the merged view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub global: bool,
}

impl CommandEntry {
    pub fn new(name: impl Into<String>, command: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            global: scope == Scope::Global,
        }
    }

    /// The scope this entry was created with.
    pub fn scope(&self) -> Scope {
        if self.global {
            Scope::Global
        } else {
            Scope::Local
        }
    }
}

/// On-disk shape of the per-project store: `{ "commands": [ ... ] }`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDocument {
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}
