//! Recording adapter for the `GitRepo` port.

use std::path::Path;

use serde::Serialize;

use super::{record_result, PathInput};
use crate::cassette::session::SharedRecorder;
use crate::ports::{GitRepo, PortResult};

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: SharedRecorder,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RangeInput<'a> {
    base: &'a str,
    head: Option<&'a str>,
}

impl GitRepo for RecordingGitRepo {
    fn current_commit(&self) -> PortResult<String> {
        let result = self.inner.current_commit();
        record_result(&self.recorder, "git", "current_commit", &(), &result);
        result
    }

    fn changed_files(&self, base: &str, head: Option<&str>) -> PortResult<Vec<String>> {
        let result = self.inner.changed_files(base, head);
        record_result(&self.recorder, "git", "changed_files", &RangeInput { base, head }, &result);
        result
    }

    fn list_files(&self, path: &Path) -> PortResult<Vec<String>> {
        let result = self.inner.list_files(path);
        let input = PathInput { path: &path.display().to_string() };
        record_result(&self.recorder, "git", "list_files", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::LiveGitRepo;
    use crate::cassette::format::Cassette;
    use crate::cassette::recorder::CassetteRecorder;
    use std::sync::{Arc, Mutex};

    #[test]
    fn records_failed_commit_lookup_as_err() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("git.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        {
            let git = RecordingGitRepo::new(
                Box::new(LiveGitRepo::new(dir.path())),
                Arc::clone(&recorder),
            );
            assert!(git.current_commit().is_err());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = Cassette::from_yaml(&std::fs::read_to_string(&cassette_path).unwrap()).unwrap();
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].method, "current_commit");
        assert!(cassette.interactions[0].output.get("err").is_some());
    }
}
