//! List rows shown to the user for each command in the merged view.

use commands::{CommandEntry, CommandRegistry};

/// One row of the command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandListItem {
    /// The entry's display name.
    pub label: String,
    /// The command text, shown dimmed next to the name.
    pub detail: String,
    /// "Global Command" or "Local Command".
    pub scope_label: &'static str,
}

/// Build display rows for the registry's current merged view. The scope
/// label comes from the registry's lookup, not from the entry's stored flag.
pub fn list_items(registry: &CommandRegistry) -> Vec<CommandListItem> {
    registry
        .entries()
        .iter()
        .map(|entry| CommandListItem {
            label: entry.name.clone(),
            detail: entry.command.clone(),
            scope_label: scope_label(registry, entry),
        })
        .collect()
}

fn scope_label(registry: &CommandRegistry, entry: &CommandEntry) -> &'static str {
    if registry.is_global(entry) {
        "Global Command"
    } else {
        "Local Command"
    }
}
