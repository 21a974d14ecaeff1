//! Mapping from workspace files to the services that own them.

use std::collections::BTreeSet;

use crate::config::WorkspaceConfig;

/// How files map to services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLayout {
    /// `services_dir` with a trailing `/`, or empty for top-level directories.
    prefix: String,
    /// Explicit `(path/, name)` entries, longest path first.
    explicit: Vec<(String, String)>,
}

impl ServiceLayout {
    /// Builds the layout described by `config`.
    #[must_use]
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        let dir = config.services_dir.trim_matches('/');
        let prefix = if dir.is_empty() || dir == "." { String::new() } else { format!("{dir}/") };
        let mut explicit: Vec<(String, String)> = config
            .services
            .iter()
            .map(|s| (format!("{}/", s.path.trim_matches('/')), s.name.clone()))
            .collect();
        explicit.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { prefix, explicit }
    }

    /// The service owning `file`, if any.
    ///
    /// An explicit entry with the longest matching path wins. Otherwise the
    /// first directory below `services_dir` names the service; files sitting
    /// directly in `services_dir`, or outside it, belong to no service.
    #[must_use]
    pub fn service_for(&self, file: &str) -> Option<String> {
        if let Some((_, name)) = self.explicit.iter().find(|(path, _)| file.starts_with(path.as_str())) {
            return Some(name.clone());
        }
        let rest = file.strip_prefix(self.prefix.as_str())?;
        let (service, _) = rest.split_once('/')?;
        (!service.is_empty() && !service.starts_with('.')).then(|| service.to_string())
    }

    /// Explicit services plus every service discovered among `files`.
    pub fn known_services<'f, I>(&self, files: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'f str>,
    {
        let mut known: BTreeSet<String> = self.explicit.iter().map(|(_, name)| name.clone()).collect();
        known.extend(files.into_iter().filter_map(|f| self.service_for(f)));
        known
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(yaml: &str) -> ServiceLayout {
        ServiceLayout::from_config(&WorkspaceConfig::parse(yaml).unwrap())
    }

    #[test]
    fn first_directory_under_services_dir() {
        let l = layout("");
        assert_eq!(l.service_for("services/api/src/main.ts").as_deref(), Some("api"));
        assert_eq!(l.service_for("services/web/package.json").as_deref(), Some("web"));
        assert_eq!(l.service_for("services/README.md"), None);
        assert_eq!(l.service_for("packages/shared/index.ts"), None);
        assert_eq!(l.service_for("servicesx/api/main.ts"), None);
    }

    #[test]
    fn dot_services_dir_uses_top_level() {
        let l = layout("services_dir: \".\"\n");
        assert_eq!(l.service_for("billing/src/index.ts").as_deref(), Some("billing"));
        assert_eq!(l.service_for("package.json"), None);
        assert_eq!(l.service_for(".github/workflows/ci.yml"), None);
    }

    #[test]
    fn explicit_entries_win_longest_first() {
        let l = layout(
            "services:\n  - {name: infra, path: infra}\n  - {name: gateway, path: infra/gateway/}\n",
        );
        assert_eq!(l.service_for("infra/gateway/src/index.ts").as_deref(), Some("gateway"));
        assert_eq!(l.service_for("infra/terraform/main.ts").as_deref(), Some("infra"));
        assert_eq!(l.service_for("infrastructure/x.ts"), None);
        assert_eq!(l.service_for("services/api/main.ts").as_deref(), Some("api"));
    }

    #[test]
    fn known_services_merge_explicit_and_discovered() {
        let l = layout("services:\n  - {name: gateway, path: infra/gateway}\n");
        let known = l.known_services([
            "services/api/src/main.ts",
            "services/web/src/app.tsx",
            "services/api/package.json",
            "packages/shared/index.ts",
        ]);
        assert_eq!(known.into_iter().collect::<Vec<_>>(), vec!["api", "gateway", "web"]);
    }
}
