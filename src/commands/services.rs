//! `ripple services` command.

use std::collections::BTreeMap;

use super::output::{render, OutputFormat};
use super::Workspace;
use crate::error::Result;
use crate::snapshot::service_file_counts;

/// Lists known services with the number of graph files each owns.
///
/// # Errors
///
/// Returns an error if the output cannot be serialized.
pub fn run(ws: &Workspace, format: OutputFormat) -> Result<String> {
    let counts = service_file_counts(&ws.graph, &ws.layout);
    let services: BTreeMap<&str, usize> = ws
        .known
        .iter()
        .map(|s| (s.as_str(), counts.get(s).copied().unwrap_or(0)))
        .collect();
    render(format, &services, || {
        let width = services.keys().map(|s| s.len()).max().unwrap_or(0);
        services
            .iter()
            .map(|(name, count)| {
                let noun = if *count == 1 { "file" } else { "files" };
                format!("{name:<width$}  {count} {noun}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}
