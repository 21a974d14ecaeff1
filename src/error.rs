//! Error type shared by the graph, impact, and command layers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while computing the impact of a change.
#[derive(Debug, Error)]
pub enum RippleError {
    /// The workspace configuration file could not be read.
    #[error("failed to read config {path}: {message}")]
    ConfigRead {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying read failure.
        message: String,
    },

    /// The workspace configuration file is not valid YAML for the schema.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        /// Path of the config file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The configuration parsed but violates a constraint.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A port (git, filesystem, clock) call failed.
    #[error("{context}: {message}")]
    Port {
        /// What was being attempted.
        context: String,
        /// Error reported by the port.
        message: String,
    },

    /// Neither a base ref nor an explicit changed-file list was given.
    #[error("no change source: pass --base <REF> or --changed <PATH>...")]
    MissingChangeSource,

    /// A service name does not match any known service.
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// A file is not part of the import graph.
    #[error("file is not part of the import graph: {0}")]
    UnknownFile(String),

    /// `graph --diff` was requested but no snapshot was written before.
    #[error("no previous graph snapshot at {0}")]
    MissingSnapshot(PathBuf),

    /// Command-line parsing failed; the message is already formatted by clap.
    #[error("{0}")]
    Usage(String),

    /// YAML (de)serialization failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Local I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RippleError {
    /// Wraps a port failure with the operation that triggered it.
    pub(crate) fn port(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Port { context: context.into(), message: err.to_string() }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RippleError>;
