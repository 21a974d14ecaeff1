//! Resolution of import specifiers to workspace files.

use std::collections::BTreeSet;

use crate::config::WorkspaceConfig;

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A file in the workspace, root-relative.
    Internal(String),
    /// A package outside the workspace (npm dependency or builtin).
    External(String),
    /// Looked like a workspace path but matched no file.
    Unresolved(String),
}

struct Alias {
    key: String,
    target: String,
    wildcard: bool,
}

/// Resolves specifiers against a fixed index of workspace files.
pub struct Resolver<'a> {
    files: &'a BTreeSet<String>,
    aliases: Vec<Alias>,
    extensions: &'a [String],
}

impl<'a> Resolver<'a> {
    /// Builds a resolver over `files` (root-relative paths) using the
    /// aliases and extensions from `config`.
    #[must_use]
    pub fn new(files: &'a BTreeSet<String>, config: &'a WorkspaceConfig) -> Self {
        let mut aliases: Vec<Alias> = config
            .aliases
            .iter()
            .map(|(key, target)| match key.strip_suffix('*') {
                Some(prefix) => {
                    Alias { key: prefix.to_string(), target: target.clone(), wildcard: true }
                }
                None => Alias {
                    key: key.trim_end_matches('/').to_string(),
                    target: target.trim_end_matches('/').to_string(),
                    wildcard: false,
                },
            })
            .collect();
        // Longest key first so `@app/shared` beats `@app`.
        aliases.sort_by(|a, b| b.key.len().cmp(&a.key.len()).then_with(|| a.key.cmp(&b.key)));
        Self { files, aliases, extensions: &config.extensions }
    }

    /// Resolves `specifier` as written in `importer`.
    #[must_use]
    pub fn resolve(&self, importer: &str, specifier: &str) -> Resolution {
        let candidate = if is_relative(specifier) {
            let dir = importer.rsplit_once('/').map_or("", |(dir, _)| dir);
            normalize(&format!("{dir}/{specifier}"))
        } else if let Some(rooted) = specifier.strip_prefix('/') {
            normalize(rooted)
        } else if let Some(target) = self.alias_target(specifier) {
            normalize(&target)
        } else {
            return Resolution::External(package_name(specifier).to_string());
        };

        match candidate.and_then(|c| self.first_existing(&c)) {
            Some(path) => Resolution::Internal(path),
            None => Resolution::Unresolved(specifier.to_string()),
        }
    }

    fn alias_target(&self, specifier: &str) -> Option<String> {
        self.aliases.iter().find_map(|alias| {
            if alias.wildcard {
                let rest = specifier.strip_prefix(alias.key.as_str())?;
                Some(if alias.target.contains('*') {
                    alias.target.replacen('*', rest, 1)
                } else {
                    alias.target.clone()
                })
            } else if specifier == alias.key {
                Some(alias.target.clone())
            } else {
                let rest = specifier.strip_prefix(alias.key.as_str())?.strip_prefix('/')?;
                Some(format!("{}/{rest}", alias.target))
            }
        })
    }

    /// Tries the candidate as a file, with each extension, as the TypeScript
    /// source of a `.js` specifier, then as a directory index.
    fn first_existing(&self, candidate: &str) -> Option<String> {
        let mut tries = Vec::new();
        if !candidate.is_empty() {
            tries.push(candidate.to_string());
            tries.extend(self.extensions.iter().map(|ext| format!("{candidate}{ext}")));
            if let Some((stem, ext)) = candidate.rsplit_once('.') {
                tries.extend(ts_sources(ext).iter().map(|ts| format!("{stem}{ts}")));
            }
        }
        let dir = if candidate.is_empty() { String::new() } else { format!("{candidate}/") };
        tries.extend(self.extensions.iter().map(|ext| format!("{dir}index{ext}")));
        tries.into_iter().find(|path| self.files.contains(path))
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}

/// TypeScript extensions that compile to the given JavaScript extension.
fn ts_sources(js_ext: &str) -> &'static [&'static str] {
    match js_ext {
        "js" => &[".ts", ".tsx"],
        "jsx" => &[".tsx"],
        "mjs" => &[".mts"],
        "cjs" => &[".cts"],
        _ => &[],
    }
}

/// Package part of a bare specifier: `@scope/pkg/sub` → `@scope/pkg`,
/// `lodash/fp` → `lodash`.
fn package_name(specifier: &str) -> &str {
    let mut parts = specifier.splitn(3, '/');
    let first = parts.next().unwrap_or(specifier);
    if first.starts_with('@') {
        if let Some(second) = parts.next() {
            return &specifier[..first.len() + 1 + second.len()];
        }
    }
    first
}

/// Collapses `.` and `..` segments and duplicate separators. Returns `None`
/// when the path climbs above the workspace root.
#[must_use]
pub fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}
