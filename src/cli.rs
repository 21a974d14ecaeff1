//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::commands::output::OutputFormat;

/// Top-level CLI parser for `ripple`.
#[derive(Debug, Parser)]
#[command(
    name = "ripple",
    version,
    about = "Find the services a change impacts by walking the reverse import graph"
)]
pub struct Cli {
    /// Workspace root (defaults to the current directory).
    #[arg(long, global = true, env = "RIPPLE_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file, relative to the root unless absolute [default: ripple.yaml].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Where the list of changed files comes from.
#[derive(Debug, Clone, Default, Args)]
pub struct ChangeArgs {
    /// Base ref of the compared range.
    #[arg(long, env = "RIPPLE_BASE", value_name = "REF")]
    pub base: Option<String>,

    /// Head ref of the compared range [default: working tree].
    #[arg(long, env = "RIPPLE_HEAD", value_name = "REF")]
    pub head: Option<String>,

    /// Explicit changed paths; takes precedence over --base.
    #[arg(long, num_args = 1.., value_name = "PATH")]
    pub changed: Vec<String>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the services impacted by a change.
    Affected {
        /// Change source.
        #[command(flatten)]
        change: ChangeArgs,
    },
    /// Show which services to rebuild and which to skip.
    Plan {
        /// Change source.
        #[command(flatten)]
        change: ChangeArgs,
    },
    /// List every file that transitively imports the given files.
    Dependants {
        /// Root-relative paths of files in the import graph.
        #[arg(required = true, value_name = "FILE")]
        files: Vec<String>,
    },
    /// Explain how a file reaches the services it impacts.
    Why {
        /// Root-relative path of a file in the import graph.
        #[arg(value_name = "FILE")]
        file: String,
        /// Only explain this service.
        #[arg(long, value_name = "NAME")]
        service: Option<String>,
    },
    /// List known services and how many files each owns.
    Services,
    /// Write a snapshot of the import graph.
    Graph {
        /// Compare against the previous snapshot before overwriting it.
        #[arg(long)]
        diff: bool,
    },
}
