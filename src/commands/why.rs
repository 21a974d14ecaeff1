//! `ripple why` command.

use std::collections::BTreeMap;

use super::output::{render, OutputFormat};
use super::Workspace;
use crate::error::{Result, RippleError};
use crate::impact::{self, ImpactReason};

/// Explains, per impacted service, how a change to `file` reaches it.
///
/// With `service`, only that service is explained.
///
/// # Errors
///
/// Returns an error if `file` is not in the graph or `service` is unknown.
pub fn run(ws: &Workspace, file: &str, service: Option<&str>, format: OutputFormat) -> Result<String> {
    let file = ws.relative(file);
    if !ws.graph.contains(&file) {
        return Err(RippleError::UnknownFile(file));
    }
    if let Some(name) = service {
        if !ws.known.contains(name) {
            return Err(RippleError::UnknownService(name.to_string()));
        }
    }

    let report = impact::analyze(&ws.graph, &ws.layout, &ws.config, &[file.clone()], &ws.known);
    let reasons: BTreeMap<&str, &ImpactReason> = report
        .services
        .iter()
        .filter(|(name, _)| service.is_none() || service == Some(name.as_str()))
        .map(|(name, impact)| (name.as_str(), &impact.reason))
        .collect();

    render(format, &reasons, || {
        if reasons.is_empty() {
            return match service {
                Some(name) => format!("{file} does not impact {name}"),
                None => format!("{file} impacts no service"),
            };
        }
        reasons
            .iter()
            .map(|(name, reason)| match reason {
                ImpactReason::Direct { file } => format!("{name}: {file} belongs to {name}"),
                ImpactReason::Dependency { chain, .. } => format!("{name}: {}", chain.join(" <- ")),
                ImpactReason::Global { file } => format!("{name}: {file} is a global file"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}
