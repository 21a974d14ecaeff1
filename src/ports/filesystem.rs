//! Filesystem port for workspace file I/O.

use std::path::Path;

use super::PortResult;

/// Provides filesystem access for reading sources and writing snapshots.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as text. Invalid UTF-8 sequences
    /// are replaced with U+FFFD rather than failing the read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read_to_string(&self, path: &Path) -> PortResult<String>;

    /// Writes the given contents to a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> PortResult<()>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Recursively lists files under `root`, as root-relative paths with `/`
    /// separators, sorted.
    ///
    /// Directories whose name appears in `skip_dirs` are not descended into.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` or one of its subdirectories cannot be read.
    fn walk(&self, root: &Path, skip_dirs: &[String]) -> PortResult<Vec<String>>;
}
