//! Persisted snapshots of the import graph.
//!
//! `ripple graph` writes one to `snapshot_path`; `ripple graph --diff`
//! compares the previous snapshot with a fresh one.

pub mod diff;

pub use diff::{diff, format_diff, FileChange, SnapshotDiff};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::WorkspaceConfig;
use crate::context::ServiceContext;
use crate::error::{Result, RippleError};
use crate::graph::DepMap;
use crate::impact::ServiceLayout;

/// Import graph tied to a commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    /// Commit the graph was built at, or `unknown`.
    pub commit_hash: String,
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
    /// Number of files in the graph.
    pub file_count: usize,
    /// Every file with the files it imports.
    pub imports: BTreeMap<String, Vec<String>>,
    /// Unresolved specifiers per file, for files that have any.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unresolved: BTreeMap<String, Vec<String>>,
    /// Number of graph files per service.
    pub services: BTreeMap<String, usize>,
}

impl GraphSnapshot {
    /// Captures `graph` with the current commit and time.
    #[must_use]
    pub fn capture(ctx: &ServiceContext, graph: &DepMap, layout: &ServiceLayout) -> Self {
        let commit_hash = ctx.git.current_commit().unwrap_or_else(|e| {
            warn!(error = %e, "could not read commit hash, recording 'unknown'");
            "unknown".to_string()
        });
        let imports = graph
            .files()
            .map(|f| (f.to_string(), graph.imports_of(f).map(String::from).collect()))
            .collect();
        let unresolved = graph
            .unresolved()
            .iter()
            .map(|(f, specs)| (f.clone(), specs.iter().cloned().collect()))
            .collect();
        Self {
            commit_hash,
            generated_at: ctx.clock.now(),
            file_count: graph.file_count(),
            imports,
            unresolved,
            services: service_file_counts(graph, layout),
        }
    }

    /// Writes the snapshot as YAML to the configured path under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, ctx: &ServiceContext, root: &Path, config: &WorkspaceConfig) -> Result<PathBuf> {
        let yaml = serde_yaml::to_string(self)?;
        let path = root.join(&config.snapshot_path);
        ctx.fs
            .write(&path, &yaml)
            .map_err(|e| RippleError::port(format!("failed to write snapshot to {}", path.display()), e))?;
        debug!(path = %path.display(), files = self.file_count, "wrote snapshot");
        Ok(path)
    }

    /// Loads the snapshot at the configured path, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(ctx: &ServiceContext, root: &Path, config: &WorkspaceConfig) -> Result<Option<Self>> {
        let path = root.join(&config.snapshot_path);
        if !ctx.fs.exists(&path) {
            return Ok(None);
        }
        let text = ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| RippleError::port(format!("failed to read snapshot {}", path.display()), e))?;
        Ok(Some(serde_yaml::from_str(&text)?))
    }
}

/// Number of graph files owned by each service.
#[must_use]
pub fn service_file_counts(graph: &DepMap, layout: &ServiceLayout) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for file in graph.files() {
        if let Some(service) = layout.service_for(file) {
            *counts.entry(service).or_insert(0) += 1;
        }
    }
    counts
}
