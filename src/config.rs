//! Workspace configuration (`ripple.yaml`).
//!
//! Every field is optional; an absent file behaves like an empty one.
//!
//! ```yaml
//! services_dir: services
//! services:
//!   - name: gateway
//!     path: infra/gateway
//! aliases:
//!   "@shared/*": packages/shared/src/*
//!   "@config": packages/config/index.ts
//! global: [package.json, yarn.lock]
//! ignore: ["*.md"]
//! file_source: git
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{Result, RippleError};

/// Default config file name, looked up at the workspace root.
pub const CONFIG_FILE: &str = "ripple.yaml";

/// Parsed workspace configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory whose immediate subdirectories are services. `""` or `.`
    /// means top-level directories.
    #[serde(default = "default_services_dir")]
    pub services_dir: String,
    /// Services declared explicitly, for layouts `services_dir` can't express.
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
    /// Import alias to workspace path.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Extensions tried when resolving an import, in order.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Paths kept out of the import graph.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Paths whose change impacts every service.
    #[serde(default)]
    pub global: Vec<String>,
    /// Changed paths that never trigger a rebuild.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// How workspace files are listed.
    #[serde(default)]
    pub file_source: FileSource,
    /// Where `ripple graph` writes its snapshot, relative to the root.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

/// An explicitly declared service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Service name as reported in output.
    pub name: String,
    /// Directory of the service, relative to the workspace root.
    pub path: String,
}

/// Source of the workspace file list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSource {
    /// `git ls-files`.
    #[default]
    Git,
    /// Recursive directory walk, for trees that are not git checkouts.
    Walk,
}

fn default_services_dir() -> String {
    "services".to_string()
}

fn default_extensions() -> Vec<String> {
    [".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json"].map(String::from).to_vec()
}

fn default_exclude() -> Vec<String> {
    ["node_modules/", "dist/", "build/", "coverage/", ".git/", ".ripple/"].map(String::from).to_vec()
}

fn default_snapshot_path() -> String {
    ".ripple/depmap.yaml".to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            services_dir: default_services_dir(),
            services: Vec::new(),
            aliases: BTreeMap::new(),
            extensions: default_extensions(),
            exclude: default_exclude(),
            global: Vec::new(),
            ignore: Vec::new(),
            file_source: FileSource::default(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl WorkspaceConfig {
    /// Loads the config for the workspace at `root`.
    ///
    /// `explicit` overrides the default `ripple.yaml` location; relative
    /// paths resolve against `root`. A missing default file yields the
    /// defaults, a missing explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(ctx: &ServiceContext, root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path: PathBuf = match explicit {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => root.join(p),
            None => {
                let default = root.join(CONFIG_FILE);
                if !ctx.fs.exists(&default) {
                    debug!(path = %default.display(), "no config file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| RippleError::ConfigRead { path: path.clone(), message: e.to_string() })?;
        let config = Self::parse(&text).map_err(|e| match e {
            RippleError::Yaml(source) => RippleError::ConfigParse { path: path.clone(), source },
            other => other,
        })?;
        debug!(path = %path.display(), services = config.services.len(), "loaded config");
        Ok(config)
    }

    /// Parses and validates config text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or validation fails.
    pub fn parse(text: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        let config: Self =
            if text.trim().is_empty() { Self::default() } else { serde_yaml::from_str(text)? };
        config.validate()?;
        Ok(config)
    }

    /// Checks constraints serde can't express.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let mut names = BTreeSet::new();
        for service in &self.services {
            if service.name.trim().is_empty() {
                return Err(RippleError::InvalidConfig("service name must not be empty".into()));
            }
            if !names.insert(service.name.as_str()) {
                return Err(RippleError::InvalidConfig(format!(
                    "duplicate service name '{}'",
                    service.name
                )));
            }
            let path = service.path.trim_matches('/');
            if path.is_empty() || Path::new(&service.path).is_absolute() {
                return Err(RippleError::InvalidConfig(format!(
                    "service '{}' needs a relative, non-empty path",
                    service.name
                )));
            }
        }
        if let Some(ext) = self.extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(RippleError::InvalidConfig(format!("extension '{ext}' must start with '.'")));
        }
        Ok(())
    }

    /// Whether `path` is kept out of the graph.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|p| pattern_matches(p, path))
    }

    /// Whether a change to `path` impacts every service.
    #[must_use]
    pub fn is_global(&self, path: &str) -> bool {
        self.global.iter().any(|p| pattern_matches(p, path))
    }

    /// Whether a change to `path` is ignored.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignore.iter().any(|p| pattern_matches(p, path))
    }

    /// Whether files at `path` are scanned for imports.
    #[must_use]
    pub fn is_scannable(&self, path: &str) -> bool {
        self.extensions.iter().any(|ext| ext != ".json" && path.ends_with(ext.as_str()))
    }

    /// Directory names a filesystem walk should not descend into.
    #[must_use]
    pub fn skip_dirs(&self) -> Vec<String> {
        self.exclude
            .iter()
            .filter_map(|p| p.strip_suffix('/'))
            .filter(|d| !d.contains('/'))
            .map(String::from)
            .collect()
    }
}

/// Matches `path` against an `exclude` / `global` / `ignore` pattern.
///
/// `*suffix` matches the file name's suffix, `dir/` matches that directory
/// anywhere in the path, anything else must equal the path.
#[must_use]
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        let name = path.rsplit('/').next().unwrap_or(path);
        return name.ends_with(suffix);
    }
    if pattern.ends_with('/') {
        return path.starts_with(pattern) || path.contains(&format!("/{pattern}"));
    }
    path == pattern
}
