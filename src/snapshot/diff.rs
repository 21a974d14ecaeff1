//! Differences between two graph snapshots.

use serde::Serialize;

use super::GraphSnapshot;

/// Files and edges that changed between two snapshots.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SnapshotDiff {
    /// Files present only in the new snapshot.
    pub added_files: Vec<String>,
    /// Files present only in the old snapshot.
    pub removed_files: Vec<String>,
    /// Files present in both whose imports changed.
    pub changed_files: Vec<FileChange>,
}

/// Import changes within one file.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// The importing file.
    pub path: String,
    /// Imports added.
    pub added_imports: Vec<String>,
    /// Imports removed.
    pub removed_imports: Vec<String>,
}

impl SnapshotDiff {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_files.is_empty() && self.removed_files.is_empty() && self.changed_files.is_empty()
    }
}

/// Compares an old snapshot against a new one.
#[must_use]
pub fn diff(old: &GraphSnapshot, new: &GraphSnapshot) -> SnapshotDiff {
    let added_files =
        new.imports.keys().filter(|f| !old.imports.contains_key(*f)).cloned().collect();
    let removed_files =
        old.imports.keys().filter(|f| !new.imports.contains_key(*f)).cloned().collect();

    let mut changed_files = Vec::new();
    for (path, new_imports) in &new.imports {
        let Some(old_imports) = old.imports.get(path) else {
            continue;
        };
        let added_imports: Vec<String> =
            new_imports.iter().filter(|i| !old_imports.contains(i)).cloned().collect();
        let removed_imports: Vec<String> =
            old_imports.iter().filter(|i| !new_imports.contains(i)).cloned().collect();
        if !added_imports.is_empty() || !removed_imports.is_empty() {
            changed_files.push(FileChange { path: path.clone(), added_imports, removed_imports });
        }
    }

    SnapshotDiff { added_files, removed_files, changed_files }
}

/// Formats a [`SnapshotDiff`] for the terminal.
#[must_use]
pub fn format_diff(diff: &SnapshotDiff) -> String {
    if diff.is_empty() {
        return "No changes since last snapshot.".to_string();
    }

    let mut lines = Vec::new();
    if !diff.added_files.is_empty() {
        lines.push("Added files:".to_string());
        lines.extend(diff.added_files.iter().map(|f| format!("  + {f}")));
    }
    if !diff.removed_files.is_empty() {
        lines.push("Removed files:".to_string());
        lines.extend(diff.removed_files.iter().map(|f| format!("  - {f}")));
    }
    for change in &diff.changed_files {
        lines.push(format!("Changed: {}", change.path));
        lines.extend(change.added_imports.iter().map(|i| format!("  + imports {i}")));
        lines.extend(change.removed_imports.iter().map(|i| format!("  - imports {i}")));
    }
    lines.join("\n")
}
