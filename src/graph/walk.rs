//! Reverse reachability over importer edges.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::DepMap;

/// Result of a breadth-first walk from a set of changed files.
///
/// Each reached file remembers the file it was reached from, which gives
/// the shortest import chain back to a seed.
#[derive(Debug, Clone, Default)]
pub struct Reach {
    parent: BTreeMap<String, Option<String>>,
}

impl Reach {
    /// Whether `file` was reached.
    #[must_use]
    pub fn contains(&self, file: &str) -> bool {
        self.parent.contains_key(file)
    }

    /// Whether `file` is one of the seeds.
    #[must_use]
    pub fn is_seed(&self, file: &str) -> bool {
        matches!(self.parent.get(file), Some(None))
    }

    /// Reached files, sorted.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.parent.keys().map(String::as_str)
    }

    /// Number of reached files, seeds included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether nothing was reached (no seeds).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Shortest chain `seed → … → file`, each step being "is imported by".
    #[must_use]
    pub fn chain(&self, file: &str) -> Option<Vec<String>> {
        let mut chain = vec![file.to_string()];
        let mut current = self.parent.get(file)?;
        while let Some(prev) = current {
            chain.push(prev.clone());
            current = self.parent.get(prev.as_str())?;
        }
        chain.reverse();
        Some(chain)
    }
}

/// Walks importer edges breadth-first from every seed.
///
/// Seeds absent from the graph (deleted files, non-source files) are still
/// reached themselves. The visited set makes cycles terminate.
pub fn reach<'s, I>(graph: &DepMap, seeds: I) -> Reach
where
    I: IntoIterator<Item = &'s str>,
{
    let mut parent: BTreeMap<String, Option<String>> = BTreeMap::new();
    let mut queue = VecDeque::new();
    for seed in seeds {
        if !parent.contains_key(seed) {
            parent.insert(seed.to_string(), None);
            queue.push_back(seed.to_string());
        }
    }
    while let Some(file) = queue.pop_front() {
        for importer in graph.importers_of(&file) {
            if !parent.contains_key(importer) {
                parent.insert(importer.to_string(), Some(file.clone()));
                queue.push_back(importer.to_string());
            }
        }
    }
    Reach { parent }
}

/// Transitive importers of `seeds`, seeds included.
pub fn dependants<'s, I>(graph: &DepMap, seeds: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'s str>,
{
    reach(graph, seeds).parent.into_keys().collect()
}
