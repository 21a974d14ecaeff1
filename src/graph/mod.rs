//! The workspace import graph.
//!
//! [`DepMap`] keeps, for every file, the files that import it. The impact
//! walk only needs that reverse direction; forward edges and unresolved
//! specifiers are kept for snapshots and diagnostics.

pub mod builder;
pub mod resolve;
pub mod scan;
pub mod walk;

pub use builder::build;

use std::collections::{BTreeMap, BTreeSet};

/// Directed import graph over root-relative file paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepMap {
    importers: BTreeMap<String, BTreeSet<String>>,
    imports: BTreeMap<String, BTreeSet<String>>,
    unresolved: BTreeMap<String, BTreeSet<String>>,
}

impl DepMap {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file, even if nothing imports it and it imports nothing.
    pub fn add_file(&mut self, file: &str) {
        if !self.imports.contains_key(file) {
            self.imports.insert(file.to_string(), BTreeSet::new());
            self.importers.insert(file.to_string(), BTreeSet::new());
        }
    }

    /// Records that `importer` imports `imported`. Self-imports are dropped.
    /// Returns `true` if the edge is new.
    pub fn add_edge(&mut self, importer: &str, imported: &str) -> bool {
        if importer == imported {
            return false;
        }
        self.add_file(importer);
        self.add_file(imported);
        let fresh = self
            .imports
            .get_mut(importer)
            .is_some_and(|set| set.insert(imported.to_string()));
        if let Some(set) = self.importers.get_mut(imported) {
            set.insert(importer.to_string());
        }
        fresh
    }

    /// Records an import of `file` that could not be resolved.
    pub fn record_unresolved(&mut self, file: &str, specifier: &str) {
        self.add_file(file);
        self.unresolved.entry(file.to_string()).or_default().insert(specifier.to_string());
    }

    /// Files that directly import `file`.
    pub fn importers_of<'a>(&'a self, file: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.importers.get(file).into_iter().flatten().map(String::as_str)
    }

    /// Files `file` directly imports.
    pub fn imports_of<'a>(&'a self, file: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.imports.get(file).into_iter().flatten().map(String::as_str)
    }

    /// Whether `file` is part of the graph.
    #[must_use]
    pub fn contains(&self, file: &str) -> bool {
        self.imports.contains_key(file)
    }

    /// All files, sorted.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.imports.keys().map(String::as_str)
    }

    /// Number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.imports.len()
    }

    /// Number of distinct import edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.imports.values().map(BTreeSet::len).sum()
    }

    /// Unresolved specifiers per importing file.
    #[must_use]
    pub fn unresolved(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.unresolved
    }
}
