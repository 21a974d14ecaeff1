//! Integration tests for top-level CLI behavior.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const CONFIG: &str = "\
file_source: walk
aliases:
  \"@shared/*\": packages/shared/src/*
global: [yarn.lock]
ignore: [\"*.md\"]
";

/// ```text
/// packages/shared/src/log.ts ← index.ts ← services/api/src/main.ts ← server.ts
///                                       ← services/web/src/app.tsx
/// services/worker/src/job.ts (imports nothing from the workspace)
/// ```
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        ("ripple.yaml", CONFIG),
        ("yarn.lock", "# lockfile\n"),
        ("services/api/README.md", "# api\n"),
        ("packages/shared/src/log.ts", "export const log = (m: string) => console.log(m);\n"),
        ("packages/shared/src/index.ts", "export * from './log';\n"),
        ("services/api/src/main.ts", "import { log } from '@shared/index';\nimport express from 'express';\n"),
        ("services/api/src/server.ts", "import './main';\n"),
        (
            "services/web/src/app.tsx",
            "import React from 'react';\nimport { log } from '../../../packages/shared/src';\n",
        ),
        ("services/worker/src/job.ts", "// import { log } from '@shared/index';\nexport const job = 1;\n"),
        ("node_modules/react/index.js", "module.exports = require('./cjs/react');\n"),
    ];
    for (path, contents) in files {
        write(dir.path(), path, contents);
    }
    dir
}

fn write(root: &Path, path: &str, contents: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, contents).unwrap();
}

fn git(root: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["-c", "user.name=Ripple", "-c", "user.email=ripple@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {args:?} failed");
}

/// The same workspace as a git repository listed with the default
/// `file_source: git`, plus a `café` service, committed once.
fn git_workspace() -> TempDir {
    let ws = workspace();
    let root = ws.path();
    write(root, "ripple.yaml", &CONFIG.replace("file_source: walk\n", ""));
    write(root, ".gitignore", "node_modules/\n");
    write(root, "services/café/src/index.ts", "import { util } from './util';\n");
    write(root, "services/café/src/util.ts", "export const util = 1;\n");
    git(root, &["init", "-q"]);
    git(root, &["add", "."]);
    git(root, &["commit", "-q", "-m", "initial"]);
    ws
}

fn run_ripple(root: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_ripple");
    Command::new(bin)
        .arg("--root")
        .arg(root)
        .args(args)
        .current_dir(root)
        .env_remove("RIPPLE_BASE")
        .env_remove("RIPPLE_HEAD")
        .env_remove("RIPPLE_RECORD")
        .env_remove("RIPPLE_ROOT")
        .output()
        .expect("failed to run ripple binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn affected_follows_shared_package_to_importers() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["affected", "--changed", "packages/shared/src/log.ts"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "api\nweb\n");
}

#[test]
fn affected_reads_imports_from_files_with_invalid_utf8() {
    let ws = workspace();
    let mut source = b"// caf\xe9 au lait\n".to_vec();
    source.extend_from_slice(b"import { log } from '@shared/index';\n");
    fs::write(ws.path().join("services/api/src/main.ts"), source).unwrap();

    let output = run_ripple(ws.path(), &["affected", "--changed", "packages/shared/src/log.ts"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "api\nweb\n");
}

#[test]
fn affected_over_a_git_commit_range() {
    let ws = git_workspace();
    let root = ws.path();
    write(root, "packages/shared/src/log.ts", "export const log = console.error;\n");
    write(root, "services/café/src/util.ts", "export const util = 2;\n");
    git(root, &["commit", "-q", "-am", "change shared log and café util"]);

    let output = run_ripple(root, &["affected", "--base", "HEAD~1", "--head", "HEAD"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "api\ncafé\nweb\n");

    let output =
        run_ripple(root, &["plan", "--format", "json", "--base", "HEAD~1", "--head", "HEAD"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let plan: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(plan["base"], "HEAD~1");
    assert_eq!(plan["head"], "HEAD");
    assert_eq!(plan["skip"], serde_json::json!(["worker"]));
}

#[test]
fn affected_against_working_tree_includes_untracked_files() {
    let ws = git_workspace();
    let root = ws.path();
    write(root, "services/worker/src/extra.ts", "export const extra = 1;\n");

    let output = run_ripple(root, &["affected", "--base", "HEAD"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "worker\n");
}

#[test]
fn affected_leaf_change_stays_in_its_service() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["affected", "--changed", "services/worker/src/job.ts"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "worker\n");
}

#[test]
fn affected_global_file_hits_every_service() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["affected", "--format", "json", "--changed", "yarn.lock"]);
    assert!(output.status.success());
    let services: Vec<String> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(services, vec!["api", "web", "worker"]);
}

#[test]
fn affected_ignored_change_prints_nothing() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["affected", "--changed", "services/api/README.md"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn affected_without_change_source_fails() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["affected"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--base"));
}

#[test]
fn plan_json_lists_rebuild_and_skip() {
    let ws = workspace();
    let output = run_ripple(
        ws.path(),
        &["plan", "--format", "json", "--changed", "services/web/src/app.tsx"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let plan: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(plan["rebuild"][0]["service"], "web");
    assert_eq!(plan["rebuild"].as_array().unwrap().len(), 1);
    assert_eq!(plan["skip"], serde_json::json!(["api", "worker"]));
}

#[test]
fn why_prints_import_chain() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["why", "packages/shared/src/log.ts", "--service", "web"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "web: packages/shared/src/log.ts <- packages/shared/src/index.ts <- services/web/src/app.tsx\n"
    );
}

#[test]
fn why_rejects_unknown_service() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["why", "packages/shared/src/log.ts", "--service", "billing"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown service: billing"));
}

#[test]
fn dependants_lists_transitive_importers() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["dependants", "packages/shared/src/index.ts"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "services/api/src/main.ts\nservices/api/src/server.ts\nservices/web/src/app.tsx\n"
    );
}

#[test]
fn services_counts_files() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["services", "--format", "yaml"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "api: 3\nweb: 1\nworker: 1\n");
}

#[test]
fn graph_snapshot_then_diff() {
    let ws = workspace();
    let first = run_ripple(ws.path(), &["graph"]);
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    assert!(stdout(&first).starts_with("Snapshot written to"));
    assert!(ws.path().join(".ripple/depmap.yaml").exists());

    write(ws.path(), "services/worker/src/extra.ts", "import { log } from '@shared/index';\n");
    let second = run_ripple(ws.path(), &["graph", "--diff"]);
    assert!(second.status.success(), "stderr: {}", stderr(&second));
    assert_eq!(stdout(&second), "Added files:\n  + services/worker/src/extra.ts\n");
}

#[test]
fn graph_diff_without_snapshot_fails() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["graph", "--diff"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no previous graph snapshot"));
}

#[test]
fn invalid_subcommand_shows_error() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["bogus"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unrecognized subcommand"));
}

#[test]
fn help_lists_subcommands() {
    let ws = workspace();
    let output = run_ripple(ws.path(), &["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("affected"));
    assert!(text.contains("dependants"));
}
