//! Build plan: which services to rebuild and which to skip.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ImpactReport;

/// Rebuild/skip decision for every service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Base ref of the compared range, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Head ref of the compared range, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Services to rebuild, sorted by name.
    pub rebuild: Vec<PlannedBuild>,
    /// Services left untouched, sorted.
    pub skip: Vec<String>,
}

/// One service to rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedBuild {
    /// Service name.
    pub service: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Splits `known` (plus anything impacted but not known) into rebuild and
/// skip lists.
#[must_use]
pub fn plan(
    report: &ImpactReport,
    known: &BTreeSet<String>,
    base: Option<&str>,
    head: Option<&str>,
) -> BuildPlan {
    let rebuild = report
        .services
        .iter()
        .map(|(service, impact)| PlannedBuild {
            service: service.clone(),
            reason: impact.reason.to_string(),
        })
        .collect();
    let skip = known.iter().filter(|s| !report.services.contains_key(*s)).cloned().collect();
    BuildPlan { base: base.map(String::from), head: head.map(String::from), rebuild, skip }
}

impl BuildPlan {
    /// Text rendering used by `ripple plan`.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        if let Some(base) = &self.base {
            lines.push(format!("range: {base}...{}", self.head.as_deref().unwrap_or("working tree")));
        }
        lines.push(format!("rebuild ({}):", self.rebuild.len()));
        for build in &self.rebuild {
            lines.push(format!("  {}: {}", build.service, build.reason));
        }
        lines.push(format!("skip ({}):", self.skip.len()));
        for service in &self.skip {
            lines.push(format!("  {service}"));
        }
        lines.join("\n")
    }
}
