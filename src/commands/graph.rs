//! `ripple graph` command.

use serde::Serialize;

use super::output::{render, OutputFormat};
use super::Workspace;
use crate::context::ServiceContext;
use crate::error::{Result, RippleError};
use crate::snapshot::{self, GraphSnapshot};

#[derive(Serialize)]
struct Summary {
    path: String,
    commit: String,
    files: usize,
    edges: usize,
    unresolved: usize,
}

/// Writes a snapshot of the import graph.
///
/// With `show_diff`, the previous snapshot is loaded first and the
/// differences are printed instead of a summary.
///
/// # Errors
///
/// Returns [`RippleError::MissingSnapshot`] if `show_diff` is set and no
/// snapshot exists yet, or an error if reading or writing fails.
pub fn run(ctx: &ServiceContext, ws: &Workspace, show_diff: bool, format: OutputFormat) -> Result<String> {
    let previous = if show_diff {
        let old = GraphSnapshot::load(ctx, &ws.root, &ws.config)?
            .ok_or_else(|| RippleError::MissingSnapshot(ws.root.join(&ws.config.snapshot_path)))?;
        Some(old)
    } else {
        None
    };

    let current = GraphSnapshot::capture(ctx, &ws.graph, &ws.layout);
    let path = current.save(ctx, &ws.root, &ws.config)?;

    if let Some(old) = previous {
        let d = snapshot::diff(&old, &current);
        return render(format, &d, || snapshot::format_diff(&d));
    }

    let summary = Summary {
        path: path.display().to_string(),
        commit: current.commit_hash.clone(),
        files: current.file_count,
        edges: ws.graph.edge_count(),
        unresolved: current.unresolved.values().map(Vec::len).sum(),
    };
    render(format, &summary, || {
        format!(
            "Snapshot written to {}: {} files, {} imports, {} unresolved",
            summary.path, summary.files, summary.edges, summary.unresolved
        )
    })
}
