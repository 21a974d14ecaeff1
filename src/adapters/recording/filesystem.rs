//! Recording adapter for the `FileSystem` port.

use std::path::Path;

use serde::Serialize;

use super::{record_interaction, record_result, PathInput};
use crate::cassette::session::SharedRecorder;
use crate::ports::{FileSystem, PortResult};

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: SharedRecorder,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: &'a str,
    contents: &'a str,
}

#[derive(Serialize)]
struct WalkInput<'a> {
    root: &'a str,
    skip_dirs: &'a [String],
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        let result = self.inner.read_to_string(path);
        let input = PathInput { path: &path.display().to_string() };
        record_result(&self.recorder, "fs", "read_to_string", &input, &result);
        result
    }

    fn write(&self, path: &Path, contents: &str) -> PortResult<()> {
        let result = self.inner.write(path, contents);
        let input = WriteInput { path: &path.display().to_string(), contents };
        record_result(&self.recorder, "fs", "write", &input, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        let input = PathInput { path: &path.display().to_string() };
        record_interaction(&self.recorder, "fs", "exists", &input, &result);
        result
    }

    fn walk(&self, root: &Path, skip_dirs: &[String]) -> PortResult<Vec<String>> {
        let result = self.inner.walk(root, skip_dirs);
        let input = WalkInput { root: &root.display().to_string(), skip_dirs };
        record_result(&self.recorder, "fs", "walk", &input, &result);
        result
    }
}
