//! `ripple dependants` command.

use super::output::{render, OutputFormat};
use super::Workspace;
use crate::error::{Result, RippleError};
use crate::graph::walk;

/// Lists files that transitively import any of `files`, excluding `files`
/// themselves.
///
/// # Errors
///
/// Returns [`RippleError::UnknownFile`] if a file is not in the graph.
pub fn run(ws: &Workspace, files: &[String], format: OutputFormat) -> Result<String> {
    let seeds: Vec<String> = files.iter().map(|f| ws.relative(f)).collect();
    if let Some(unknown) = seeds.iter().find(|f| !ws.graph.contains(f)) {
        return Err(RippleError::UnknownFile(unknown.clone()));
    }
    let dependants: Vec<String> = walk::dependants(&ws.graph, seeds.iter().map(String::as_str))
        .into_iter()
        .filter(|f| !seeds.contains(f))
        .collect();
    render(format, &dependants, || dependants.join("\n"))
}
