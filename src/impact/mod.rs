//! Impacted services for a set of changed files.
//!
//! Changed paths seed a reverse walk over the import graph; every reached
//! file is mapped to its service, and each service keeps the strongest
//! reason it was reached for.

pub mod plan;
pub mod services;

pub use plan::{plan, BuildPlan, PlannedBuild};
pub use services::ServiceLayout;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::WorkspaceConfig;
use crate::graph::walk;
use crate::graph::DepMap;

/// Why a service is impacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImpactReason {
    /// A file of the service itself changed.
    Direct {
        /// The changed file.
        file: String,
    },
    /// A file of the service transitively imports a changed file.
    Dependency {
        /// The changed file the chain starts from.
        changed: String,
        /// `changed → … → file in service`, each step "is imported by".
        chain: Vec<String>,
    },
    /// A global file changed.
    Global {
        /// The changed global file.
        file: String,
    },
}

impl ImpactReason {
    /// Lower is stronger; dependency chains rank by length.
    fn rank(&self) -> (u8, usize) {
        match self {
            Self::Direct { .. } => (0, 0),
            Self::Dependency { chain, .. } => (1, chain.len()),
            Self::Global { .. } => (2, 0),
        }
    }
}

impl fmt::Display for ImpactReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct { file } => write!(f, "changed {file}"),
            Self::Dependency { changed, chain } => {
                write!(f, "depends on {changed} ({})", chain.join(" <- "))
            }
            Self::Global { file } => write!(f, "global file {file} changed"),
        }
    }
}

/// Impact on one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceImpact {
    /// Strongest reason the service is impacted.
    pub reason: ImpactReason,
    /// Impacted files of the service, sorted. Empty for purely global impact.
    pub files: Vec<String>,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// Normalized changed paths that were considered.
    pub changed: Vec<String>,
    /// Changed paths dropped by `ignore` patterns.
    pub ignored: Vec<String>,
    /// Changed paths matching `global` patterns.
    pub global_triggers: Vec<String>,
    /// Impacted services by name.
    pub services: BTreeMap<String, ServiceImpact>,
}

impl ImpactReport {
    /// Impacted service names, sorted.
    #[must_use]
    pub fn services(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }
}

/// Computes which services the `changed` paths impact.
///
/// `known` is the full service list; a global trigger impacts all of it.
#[must_use]
pub fn analyze(
    graph: &DepMap,
    layout: &ServiceLayout,
    config: &WorkspaceConfig,
    changed: &[String],
    known: &BTreeSet<String>,
) -> ImpactReport {
    let normalized: BTreeSet<String> = changed.iter().filter_map(|p| normalize_changed(p)).collect();
    let (ignored, considered): (Vec<String>, Vec<String>) =
        normalized.into_iter().partition(|p| config.is_ignored(p));
    let global_triggers: Vec<String> =
        considered.iter().filter(|p| config.is_global(p)).cloned().collect();

    let reach = walk::reach(graph, considered.iter().map(String::as_str));
    let mut services: BTreeMap<String, ServiceImpact> = BTreeMap::new();
    for file in reach.files() {
        let Some(service) = layout.service_for(file) else {
            continue;
        };
        let reason = if reach.is_seed(file) {
            ImpactReason::Direct { file: file.to_string() }
        } else {
            let chain = reach.chain(file).unwrap_or_else(|| vec![file.to_string()]);
            ImpactReason::Dependency { changed: chain[0].clone(), chain }
        };
        match services.get_mut(&service) {
            Some(impact) => {
                impact.files.push(file.to_string());
                if reason.rank() < impact.reason.rank() {
                    impact.reason = reason;
                }
            }
            None => {
                services.insert(service, ServiceImpact { reason, files: vec![file.to_string()] });
            }
        }
    }

    if let Some(trigger) = global_triggers.first() {
        for service in known {
            services.entry(service.clone()).or_insert_with(|| ServiceImpact {
                reason: ImpactReason::Global { file: trigger.clone() },
                files: Vec::new(),
            });
        }
    }

    info!(
        changed = considered.len(),
        ignored = ignored.len(),
        reached = reach.len(),
        services = services.len(),
        "computed impact"
    );
    ImpactReport { changed: considered, ignored, global_triggers, services }
}

/// Root-relative form of a changed path: `/` separators, no leading `./`.
fn normalize_changed(path: &str) -> Option<String> {
    let path = path.trim().replace('\\', "/");
    let mut path = path.as_str();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    (!path.is_empty()).then(|| path.to_string())
}
