//! Replaying adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{GitRepo, PortResult};

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn current_commit(&self) -> PortResult<String> {
        replay_result(next_output(&self.replayer, "git", "current_commit"), "git::current_commit")
    }

    fn changed_files(&self, _base: &str, _head: Option<&str>) -> PortResult<Vec<String>> {
        replay_result(next_output(&self.replayer, "git", "changed_files"), "git::changed_files")
    }

    fn list_files(&self, _path: &Path) -> PortResult<Vec<String>> {
        replay_result(next_output(&self.replayer, "git", "list_files"), "git::list_files")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(method: &str, output: serde_json::Value) -> CassetteReplayer {
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "git".into(),
                method: method.into(),
                input: json!({}),
                output,
            }],
        })
    }

    #[test]
    fn replays_changed_files() {
        let git = ReplayingGitRepo::new(make_replayer(
            "changed_files",
            json!({"ok": ["services/api/src/index.ts", "yarn.lock"]}),
        ));
        let files = git.changed_files("origin/main", Some("HEAD")).unwrap();
        assert_eq!(files, vec!["services/api/src/index.ts", "yarn.lock"]);
    }

    #[test]
    fn replays_unknown_ref_error() {
        let git = ReplayingGitRepo::new(make_replayer(
            "changed_files",
            json!({"err": "fatal: bad revision 'nope...HEAD'"}),
        ));
        assert!(git.changed_files("nope", Some("HEAD")).is_err());
    }
}
