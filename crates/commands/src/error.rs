//! Error taxonomy for command storage.
//!
//! Read paths never error: a missing or unreadable backend degrades to an
//! empty list. Write paths report failures here so the caller can surface a
//! message; a failed write means the mutation was not committed and the
//! merged view has not advanced.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandsError {
    /// A local-scope mutation was attempted with no project open.
    #[error("no project folder is open; open a project to save local commands")]
    NoWorkspace,

    /// The per-project store file could not be written.
    #[error("failed to save commands to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The global key-value store rejected a write.
    #[error("failed to update global commands: {0}")]
    Store(String),
}
