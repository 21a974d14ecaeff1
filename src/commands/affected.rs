//! `ripple affected` command.

use super::output::{render, OutputFormat};
use super::Workspace;
use crate::error::Result;
use crate::impact;

/// Lists the services impacted by `changed`, one per line.
///
/// # Errors
///
/// Returns an error if the output cannot be serialized.
pub fn run(ws: &Workspace, changed: &[String], format: OutputFormat) -> Result<String> {
    let report = impact::analyze(&ws.graph, &ws.layout, &ws.config, changed, &ws.known);
    let services = report.services();
    render(format, &services, || services.join("\n"))
}
