//! Project root resolution.

use std::path::{Path, PathBuf};

/// Find the project root for `start`: the nearest ancestor (including
/// `start` itself) that contains a command store or a `.git` marker.
/// Returns `None` when no ancestor qualifies: the no-workspace condition
/// that blocks local-scope mutations.
pub fn resolve_project_root(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        if dir.join(runbook_paths::LOCAL_STORE_FILE_NAME).is_file() || dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
    }
    None
}
