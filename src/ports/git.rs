//! Git repository port for version-control queries.

use std::path::Path;

use super::PortResult;

/// Provides read access to a git repository.
pub trait GitRepo: Send + Sync {
    /// Returns the hash of the current HEAD commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has no commits or is invalid.
    fn current_commit(&self) -> PortResult<String>;

    /// Lists paths changed between `base` and `head`.
    ///
    /// With no `head`, compares `base` against the working tree and includes
    /// untracked files. Paths are relative to the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if either ref is unknown or the diff fails.
    fn changed_files(&self, base: &str, head: Option<&str>) -> PortResult<Vec<String>>;

    /// Lists all tracked files under `path`, relative to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file list cannot be retrieved.
    fn list_files(&self, path: &Path) -> PortResult<Vec<String>>;
}
