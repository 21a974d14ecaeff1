//! Builds a [`DepMap`] for a workspace through the service ports.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, trace, warn};

use super::resolve::{Resolution, Resolver};
use super::{scan, DepMap};
use crate::config::{FileSource, WorkspaceConfig};
use crate::context::ServiceContext;
use crate::error::{Result, RippleError};

/// Builds the import graph of the workspace rooted at `root`.
///
/// Files are listed through `ctx.git` or `ctx.fs` depending on
/// `config.file_source`. Excluded paths are dropped, every other file joins
/// the graph, and scannable files are read in sorted order so a recorded
/// session replays in the same sequence.
///
/// # Errors
///
/// Returns an error if the workspace files cannot be listed. Individual
/// unreadable files are logged and skipped.
pub fn build(ctx: &ServiceContext, root: &Path, config: &WorkspaceConfig) -> Result<DepMap> {
    let listed = match config.file_source {
        FileSource::Git => ctx
            .git
            .list_files(root)
            .map_err(|e| RippleError::port("failed to list tracked files", e))?,
        FileSource::Walk => ctx
            .fs
            .walk(root, &config.skip_dirs())
            .map_err(|e| RippleError::port("failed to walk workspace", e))?,
    };
    let files: BTreeSet<String> = listed
        .into_iter()
        .map(|f| f.replace('\\', "/"))
        .filter(|f| !config.is_excluded(f))
        .collect();

    let mut graph = DepMap::new();
    for file in &files {
        graph.add_file(file);
    }

    let resolver = Resolver::new(&files, config);
    let mut scanned = 0usize;
    for file in files.iter().filter(|f| config.is_scannable(f)) {
        let source = match ctx.fs.read_to_string(&root.join(file)) {
            Ok(source) => source,
            Err(e) => {
                warn!(file = %file, error = %e, "skipping unreadable file");
                continue;
            }
        };
        scanned += 1;
        let specifiers = scan::imports(&source);
        debug!(file = %file, imports = specifiers.len(), "scanned");
        for specifier in specifiers {
            match resolver.resolve(file, &specifier) {
                Resolution::Internal(target) => {
                    graph.add_edge(file, &target);
                }
                Resolution::External(package) => {
                    trace!(file = %file, package = %package, "external import");
                }
                Resolution::Unresolved(spec) => {
                    warn!(file = %file, specifier = %spec, "unresolved import");
                    graph.record_unresolved(file, &spec);
                }
            }
        }
    }

    info!(
        files = graph.file_count(),
        scanned,
        edges = graph.edge_count(),
        unresolved = graph.unresolved().values().map(BTreeSet::len).sum::<usize>(),
        "built import graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::replay_context;
    use serde_json::json;

    fn config() -> WorkspaceConfig {
        WorkspaceConfig::parse("aliases:\n  \"@shared/*\": packages/shared/src/*\n").unwrap()
    }

    #[test]
    fn builds_edges_from_git_listing() {
        // Sorted read order: packages/shared/src/index.ts, packages/shared/src/log.ts,
        // services/api/src/main.ts, services/web/src/app.tsx.
        let ctx = replay_context(vec![
            (
                "git",
                "list_files",
                json!({"ok": [
                    "services/web/src/app.tsx",
                    "services/api/src/main.ts",
                    "packages/shared/src/index.ts",
                    "packages/shared/src/log.ts",
                    "packages/shared/package.json",
                    "node_modules/react/index.js",
                ]}),
            ),
            ("fs", "read_to_string", json!({"ok": "export * from './log';\n"})),
            ("fs", "read_to_string", json!({"ok": "export const log = console.log;\n"})),
            (
                "fs",
                "read_to_string",
                json!({"ok": "import { log } from '@shared/index';\nimport express from 'express';\n"}),
            ),
            (
                "fs",
                "read_to_string",
                json!({"ok": "import React from 'react';\nimport { log } from '../../../packages/shared/src';\n"}),
            ),
        ]);

        let graph = build(&ctx, Path::new("/repo"), &config()).unwrap();

        assert_eq!(graph.file_count(), 5);
        assert!(!graph.contains("node_modules/react/index.js"));
        assert!(graph.contains("packages/shared/package.json"));
        let importers: Vec<&str> = graph.importers_of("packages/shared/src/index.ts").collect();
        assert_eq!(importers, vec!["services/api/src/main.ts", "services/web/src/app.tsx"]);
        let importers: Vec<&str> = graph.importers_of("packages/shared/src/log.ts").collect();
        assert_eq!(importers, vec!["packages/shared/src/index.ts"]);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.unresolved().is_empty());
    }

    #[test]
    fn walk_source_records_unresolved_and_skips_unreadable() {
        let mut config = config();
        config.file_source = FileSource::Walk;
        let ctx = replay_context(vec![
            ("fs", "walk", json!({"ok": ["a.ts", "b.ts"]})),
            ("fs", "read_to_string", json!({"err": "permission denied"})),
            ("fs", "read_to_string", json!({"ok": "import './gone';\nimport './a';\n"})),
        ]);

        let graph = build(&ctx, Path::new("/repo"), &config).unwrap();

        assert_eq!(graph.imports_of("b.ts").collect::<Vec<_>>(), vec!["a.ts"]);
        assert!(graph.unresolved()["b.ts"].contains("./gone"));
    }

    #[test]
    fn listing_failure_is_a_port_error() {
        let ctx = replay_context(vec![("git", "list_files", json!({"err": "not a git repository"}))]);
        let err = build(&ctx, Path::new("/repo"), &config()).unwrap_err();
        assert!(matches!(err, RippleError::Port { .. }));
        assert!(err.to_string().contains("not a git repository"));
    }
}
