//! Command dispatch and handlers.
//!
//! Each handler returns the text to print so it can be tested without
//! capturing stdout.

pub mod affected;
pub mod dependants;
pub mod graph;
pub mod output;
pub mod plan;
pub mod services;
pub mod why;

use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cassette::session::RecordingSession;
use crate::cli::{ChangeArgs, Cli, Command};
use crate::config::WorkspaceConfig;
use crate::context::ServiceContext;
use crate::error::{Result, RippleError};
use crate::graph::DepMap;
use crate::impact::ServiceLayout;

/// Everything a command needs to know about the workspace.
pub struct Workspace {
    /// Absolute workspace root.
    pub root: PathBuf,
    /// Loaded configuration.
    pub config: WorkspaceConfig,
    /// File-to-service mapping derived from `config`.
    pub layout: ServiceLayout,
    /// Import graph of the workspace.
    pub graph: DepMap,
    /// Every known service.
    pub known: BTreeSet<String>,
}

impl Workspace {
    /// Loads config and builds the import graph for `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or files cannot be listed.
    pub fn load(ctx: &ServiceContext, root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = WorkspaceConfig::load(ctx, root, config_path)?;
        let graph = crate::graph::build(ctx, root, &config)?;
        Ok(Self::from_parts(root, config, graph))
    }

    /// Assembles a workspace from an already built graph.
    #[must_use]
    pub fn from_parts(root: &Path, config: WorkspaceConfig, graph: DepMap) -> Self {
        let layout = ServiceLayout::from_config(&config);
        let known = layout.known_services(graph.files());
        Self { root: root.to_path_buf(), config, layout, graph, known }
    }

    /// Root-relative form of a user-supplied path.
    ///
    /// Absolute paths under the root are made relative, a leading `./` is
    /// dropped, and separators become `/`.
    #[must_use]
    pub fn relative(&self, path: &str) -> String {
        relative_to(&self.root, path)
    }
}

fn relative_to(root: &Path, path: &str) -> String {
    let as_path = Path::new(path);
    let relative = match as_path.strip_prefix(root) {
        Ok(rest) => rest.to_string_lossy().into_owned(),
        Err(_) => path.to_string(),
    };
    let relative = relative.replace('\\', "/");
    let mut trimmed = relative.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}

/// Dispatch a parsed command line and print its output.
///
/// When `RIPPLE_RECORD` is set to a directory path, all port interactions are
/// recorded to per-port cassette files under that directory.
///
/// # Errors
///
/// Returns an error if the workspace cannot be loaded or the command fails.
pub fn dispatch(cli: &Cli) -> Result<()> {
    let root = workspace_root(cli.root.as_deref())?;
    let (ctx, session) = if let Ok(dir) = env::var("RIPPLE_RECORD") {
        let (ctx, session) = ServiceContext::recording_at(Path::new(&dir), &root)
            .map_err(|e| RippleError::port("failed to start recording", e))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&root), None)
    };

    let result = dispatch_with_context(cli, &ctx, &root);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    let output = result?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Runs a command against the given context and returns its output.
///
/// # Errors
///
/// Returns an error if the workspace cannot be loaded or the command fails.
pub fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext, root: &Path) -> Result<String> {
    let ws = Workspace::load(ctx, root, cli.config.as_deref())?;
    debug!(root = %root.display(), files = ws.graph.file_count(), services = ws.known.len(), "workspace loaded");
    match &cli.command {
        Command::Affected { change } => {
            let changed = changed_files(ctx, &ws, change)?;
            affected::run(&ws, &changed, cli.format)
        }
        Command::Plan { change } => {
            let changed = changed_files(ctx, &ws, change)?;
            let range = if change.changed.is_empty() { change.base.as_deref() } else { None };
            let head = range.and(change.head.as_deref());
            plan::run(&ws, &changed, range, head, cli.format)
        }
        Command::Dependants { files } => dependants::run(&ws, files, cli.format),
        Command::Why { file, service } => why::run(&ws, file, service.as_deref(), cli.format),
        Command::Services => services::run(&ws, cli.format),
        Command::Graph { diff } => graph::run(ctx, &ws, *diff, cli.format),
    }
}

/// Changed paths for a command, root-relative.
///
/// An explicit `--changed` list wins over `--base`; with neither, the
/// command cannot know what changed.
///
/// # Errors
///
/// Returns [`RippleError::MissingChangeSource`] when no source is given, or a
/// port error if git cannot produce the diff.
pub fn changed_files(ctx: &ServiceContext, ws: &Workspace, change: &ChangeArgs) -> Result<Vec<String>> {
    if !change.changed.is_empty() {
        return Ok(change.changed.iter().map(|p| ws.relative(p)).collect());
    }
    let Some(base) = change.base.as_deref() else {
        return Err(RippleError::MissingChangeSource);
    };
    let files = ctx
        .git
        .changed_files(base, change.head.as_deref())
        .map_err(|e| RippleError::port(format!("failed to diff against {base}"), e))?;
    debug!(base, head = ?change.head, changed = files.len(), "read changed files from git");
    Ok(files)
}

fn workspace_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    Ok(match explicit {
        Some(root) if root.is_absolute() => root.to_path_buf(),
        Some(root) => cwd.join(root),
        None => cwd,
    })
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<()> {
    let output_dir =
        session.finish().map_err(|e| RippleError::port("failed to save recording", e))?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
