//! `ripple plan` command.

use super::output::{render, OutputFormat};
use super::Workspace;
use crate::error::Result;
use crate::impact;

/// Prints the rebuild/skip decision for every known service.
///
/// # Errors
///
/// Returns an error if the output cannot be serialized.
pub fn run(
    ws: &Workspace,
    changed: &[String],
    base: Option<&str>,
    head: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let report = impact::analyze(&ws.graph, &ws.layout, &ws.config, changed, &ws.known);
    let plan = impact::plan(&report, &ws.known, base, head);
    render(format, &plan, || plan.render_text())
}
